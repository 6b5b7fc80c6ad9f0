//! Scripted frame input for headless sessions.
//!
//! Each non-empty line expands into one or more frames:
//!
//! ```text
//! walk <up|down|left|right> <frames>
//! press <pick_up|harvest|plant|clear_obstacle|primary>
//! clear <frames>
//! wait <frames>
//! ```

use anyhow::{anyhow, bail, Context, Result};
use valley_core::{Direction, Interaction};
use valley_system_controls::ControlInput;

/// Session played when no script file is supplied.
pub(crate) const DEMO: &str = "\
# Plant a seed in front of the entrance and watch it grow.
press primary
wait 700
press harvest
# Wander right and hack at whatever stands in the way.
walk right 45
clear 120
press pick_up
walk down 20
press primary
";

/// Expands script text into one input per frame.
pub(crate) fn parse(contents: &str) -> Result<Vec<ControlInput>> {
    let mut frames = Vec::new();
    for (index, line) in contents.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        parse_line(trimmed, &mut frames)
            .with_context(|| format!("script line {}: `{trimmed}`", index + 1))?;
    }
    Ok(frames)
}

fn parse_line(line: &str, frames: &mut Vec<ControlInput>) -> Result<()> {
    let words: Vec<&str> = line.split_whitespace().collect();
    match words.as_slice() {
        ["walk", direction, count] => {
            let input = ControlInput::new(Some(parse_direction(direction)?), None, false);
            frames.extend(std::iter::repeat(input).take(parse_count(count)?));
        }
        ["press", interaction] => {
            frames.push(ControlInput::new(
                None,
                Some(parse_interaction(interaction)?),
                false,
            ));
        }
        ["clear", count] => {
            let input = ControlInput::new(None, None, true);
            frames.extend(std::iter::repeat(input).take(parse_count(count)?));
        }
        ["wait", count] => {
            frames.extend(std::iter::repeat(ControlInput::default()).take(parse_count(count)?));
        }
        _ => bail!("unrecognised instruction"),
    }
    Ok(())
}

fn parse_count(value: &str) -> Result<usize> {
    value
        .parse::<usize>()
        .map_err(|_| anyhow!("`{value}` is not a frame count"))
}

fn parse_direction(value: &str) -> Result<Direction> {
    match value {
        "up" => Ok(Direction::Up),
        "down" => Ok(Direction::Down),
        "left" => Ok(Direction::Left),
        "right" => Ok(Direction::Right),
        other => bail!("unknown direction `{other}`"),
    }
}

fn parse_interaction(value: &str) -> Result<Interaction> {
    match value {
        "pick_up" => Ok(Interaction::PickUp),
        "harvest" => Ok(Interaction::Harvest),
        "plant" => Ok(Interaction::Plant),
        "clear_obstacle" => Ok(Interaction::ClearObstacle),
        "primary" => Ok(Interaction::Primary),
        other => bail!("unknown interaction `{other}`"),
    }
}
