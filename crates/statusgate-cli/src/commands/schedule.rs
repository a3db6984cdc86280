use clap::Subcommand;
use statusgate_core::BlockSchedule;

#[derive(Subcommand)]
pub enum ScheduleAction {
    /// Evaluate a block window at a given time
    Check {
        /// Window start, HH:MM
        #[arg(long)]
        start: String,
        /// Window end, HH:MM (before start means the window crosses midnight)
        #[arg(long)]
        end: String,
        /// Comma-separated weekdays, 0 = Sunday (omit for every day)
        #[arg(long)]
        days: Option<String>,
        /// Evaluate a disabled schedule (disabled = always blocked)
        #[arg(long)]
        disabled: bool,
        /// Evaluate at this time instead of now (RFC 3339 or YYYY-MM-DDTHH:MM)
        #[arg(long)]
        at: Option<String>,
    },
}

pub fn run(action: ScheduleAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ScheduleAction::Check {
            start,
            end,
            days,
            disabled,
            at,
        } => {
            let days = match days {
                Some(s) if !s.trim().is_empty() => s
                    .split(',')
                    .map(|d| d.trim().parse::<u8>())
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|_| "invalid --days list")?,
                _ => Vec::new(),
            };
            let schedule = BlockSchedule {
                enabled: !disabled,
                start,
                end,
                days,
            };
            let now = super::parse_at(at.as_deref())?;
            if schedule.is_blocked_at(now) {
                println!("blocked at {now}");
            } else {
                println!("not blocked at {now}");
            }
        }
    }
    Ok(())
}
