use crate::cli::commands::{open_db, require_event, session_label};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::{CheckInProcessor, MessageClass, RejectReason, ScanLifecycle, ScanOutcome};
use crate::errors::AppResult;
use crate::ui::messages::{error, info, success, warning};
use std::io::{self, BufRead, Write};

#[derive(Default)]
struct Tally {
    accepted: usize,
    duplicate: usize,
    unknown: usize,
    rejected: usize,
    failed: usize,
}

impl Tally {
    fn slot(&mut self, class: MessageClass) -> &mut usize {
        match class {
            MessageClass::Accepted => &mut self.accepted,
            MessageClass::Duplicate => &mut self.duplicate,
            MessageClass::Unknown => &mut self.unknown,
            MessageClass::Rejected => &mut self.rejected,
            MessageClass::Error => &mut self.failed,
        }
    }

    fn count(&mut self, outcome: &ScanOutcome) {
        *self.slot(outcome.message_class()) += 1;
    }

    /// The same scan ended differently (an unknown token that got admitted).
    fn reclassify(&mut self, from: &ScanOutcome, to: &ScanOutcome) {
        let prev = self.slot(from.message_class());
        *prev = prev.saturating_sub(1);
        self.count(to);
    }

    fn total(&self) -> usize {
        self.accepted + self.duplicate + self.unknown + self.rejected + self.failed
    }
}

/// Print an outcome with the color of its message class.
pub(crate) fn report(outcome: &ScanOutcome) {
    let msg = outcome.message();
    match outcome.message_class() {
        MessageClass::Accepted => success(msg),
        MessageClass::Duplicate | MessageClass::Unknown => warning(msg),
        MessageClass::Rejected | MessageClass::Error => error(msg),
    }
}

type ScanInput = Box<dyn Iterator<Item = io::Result<Vec<u8>>>>;

/// One scanner line, without its line terminator.
fn decode_line(mut raw: Vec<u8>) -> Result<String, String> {
    if raw.last() == Some(&b'\r') {
        raw.pop();
    }
    String::from_utf8(raw).map_err(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
}

fn prompt(text: &str) {
    print!("{}", text);
    let _ = io::stdout().flush();
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Scan {
        event,
        session,
        tokens,
    } = cmd
    {
        let pool = open_db(cfg)?;
        let ev = require_event(&pool, *event)?;
        let session = session_label(session, cfg);
        let processor = CheckInProcessor::new(&pool);

        let interactive = tokens.is_empty();
        let mut input: ScanInput = if interactive {
            info(format!(
                "Scanning for '{}' ({}), one token per line. Ctrl-D to stop.",
                ev.name, session
            ));
            Box::new(io::stdin().lock().split(b'\n'))
        } else {
            Box::new(tokens.clone().into_iter().map(|t| Ok(t.into_bytes())))
        };

        let mut lifecycle = ScanLifecycle::new();
        let mut tally = Tally::default();

        while let Some(line) = input.next() {
            let (token, outcome) = match decode_line(line?) {
                Ok(token) => {
                    let outcome = processor.process_scan(ev.id, &session, &token);
                    (token, outcome)
                }
                Err(lossy) => (lossy, ScanOutcome::Rejected(RejectReason::InvalidEncoding)),
            };
            lifecycle.begin(&token)?;
            report(&outcome);
            tally.count(&outcome);

            let unknown = matches!(outcome, ScanOutcome::UnknownNeedsConfirmation { .. });
            lifecycle.classify(outcome.clone())?;

            if !unknown {
                lifecycle.finish()?;
                continue;
            }

            if !(interactive && cfg.scan_prompt_unknown) {
                info("Use `rattendance admit` to add it to the roster.");
                lifecycle.finish()?;
                continue;
            }

            let token = lifecycle.confirm_addition()?;
            prompt(&format!("Name for {} (empty to skip): ", token));

            let name = match input.next().transpose() {
                Ok(line) => line.map(|raw| decode_line(raw).unwrap_or_else(|lossy| lossy)),
                Err(e) => {
                    lifecycle.abandon();
                    return Err(e.into());
                }
            };

            match name {
                Some(name) if !name.trim().is_empty() => {
                    let admitted = processor.admit_unlisted(ev.id, &session, &token, &name);
                    report(&admitted);
                    tally.reclassify(&outcome, &admitted);
                    lifecycle.finish()?;
                }
                _ => {
                    info(format!("{} not added.", token));
                    lifecycle.abandon();
                }
            }
        }

        if tally.total() == 0 {
            info("No tokens scanned.");
        } else {
            info(format!(
                "{} scan(s): {} accepted, {} duplicate, {} unknown, {} rejected, {} failed",
                tally.total(),
                tally.accepted,
                tally.duplicate,
                tally.unknown,
                tally.rejected,
                tally.failed
            ));
        }
    }

    Ok(())
}
