//! Line commands for `play`.

use aq_app::SessionCommand;
use aq_controls::DesignParadigm;
use aq_plant::FaultKind;
use aq_signals::{DisturbanceConfig, DisturbanceKind};

pub const HELP: &str = "\
commands:
  run | pause | reset | quit
  paradigm <reservoir|predictor|predictive>
  demand <type> <base> [amplitude] [frequency]
  setpoint <level>
  fault <leakage|pump|drift> <value>
  clear <leakage|pump|drift>
  valve <open|closed>";

/// What a console line asks for.
#[derive(Debug)]
pub enum ConsoleAction {
    Send(SessionCommand),
    Quit,
    Help,
}

fn number(token: Option<&str>, what: &str) -> Result<f64, String> {
    let token = token.ok_or_else(|| format!("missing {what}"))?;
    token
        .parse::<f64>()
        .map_err(|_| format!("{what} must be a number, got '{token}'"))
}

pub fn parse_line(line: &str) -> Result<Option<ConsoleAction>, String> {
    let mut tokens = line.split_whitespace();
    let Some(head) = tokens.next() else {
        return Ok(None);
    };
    let action = match head.to_ascii_lowercase().as_str() {
        "run" | "r" => ConsoleAction::Send(SessionCommand::Run),
        "pause" | "p" => ConsoleAction::Send(SessionCommand::Pause),
        "reset" => ConsoleAction::Send(SessionCommand::Reset),
        "quit" | "q" | "exit" => ConsoleAction::Quit,
        "help" | "?" => ConsoleAction::Help,
        "paradigm" => {
            let id = tokens.next().ok_or("missing paradigm id")?;
            let paradigm = DesignParadigm::preset(id).map_err(|e| e.to_string())?;
            ConsoleAction::Send(SessionCommand::SelectParadigm(paradigm))
        }
        "demand" => {
            let kind: DisturbanceKind = tokens
                .next()
                .ok_or("missing demand type")?
                .parse()
                .map_err(|e: aq_signals::SignalError| e.to_string())?;
            let base = number(tokens.next(), "base")?;
            let amplitude = tokens.next().map_or(Ok(0.0), |t| number(Some(t), "amplitude"))?;
            let frequency = tokens.next().map_or(Ok(0.1), |t| number(Some(t), "frequency"))?;
            ConsoleAction::Send(SessionCommand::SetDemand(DisturbanceConfig::new(
                kind, base, amplitude, frequency,
            )))
        }
        "setpoint" => {
            let level = number(tokens.next(), "level")?;
            ConsoleAction::Send(SessionCommand::SetSetpoint(DisturbanceConfig::constant(
                level,
            )))
        }
        "fault" => {
            let kind = fault_kind(tokens.next())?;
            let value = number(tokens.next(), "fault value")?;
            ConsoleAction::Send(SessionCommand::SetFault(kind, value))
        }
        "clear" => ConsoleAction::Send(SessionCommand::ClearFault(fault_kind(tokens.next())?)),
        "valve" => match tokens.next() {
            Some("open") => ConsoleAction::Send(SessionCommand::SetValve(true)),
            Some("closed" | "close") => ConsoleAction::Send(SessionCommand::SetValve(false)),
            _ => return Err("valve takes 'open' or 'closed'".to_string()),
        },
        other => return Err(format!("unknown command '{other}' (try 'help')")),
    };
    Ok(Some(action))
}

fn fault_kind(token: Option<&str>) -> Result<FaultKind, String> {
    token
        .ok_or("missing fault kind")?
        .parse()
        .map_err(|e: aq_plant::PlantError| e.to_string())
}
