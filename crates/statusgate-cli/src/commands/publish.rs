use clap::Args;
use statusgate_core::{publish, BlockSchedule, Config, DraftFields, HttpStore, Mode};

#[derive(Args)]
pub struct PublishArgs {
    /// Master switch for the overlay
    #[arg(long)]
    active: Option<bool>,

    /// Live mode: none, info, or warning
    #[arg(long)]
    mode: Option<String>,

    /// Copy a preset's title/message/image into the live mode first
    #[arg(long)]
    preset: Option<String>,

    #[arg(long)]
    title: Option<String>,

    #[arg(long)]
    message: Option<String>,

    #[arg(long)]
    image: Option<String>,

    /// Seconds before the info overlay can be dismissed
    #[arg(long)]
    ok_delay: Option<f64>,

    /// Message shown when the order action is pressed during a warning
    #[arg(long)]
    click_message: Option<String>,

    /// Enable the weekly block window. Without any schedule flag the
    /// stored schedule is left untouched; a disabled schedule blocks
    /// around the clock.
    #[arg(long)]
    schedule_enabled: Option<bool>,

    /// Window start, HH:MM
    #[arg(long)]
    schedule_start: Option<String>,

    /// Window end, HH:MM (before start means the window crosses midnight)
    #[arg(long)]
    schedule_end: Option<String>,

    /// Comma-separated weekdays, 0 = Sunday (empty = every day)
    #[arg(long)]
    schedule_days: Option<String>,

    /// Shorthand: deactivate and clear the live mode ("service OK")
    #[arg(long)]
    service_ok: bool,
}

pub async fn run(args: PublishArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load();
    if config.document_url.is_empty() {
        return Err("document_url is not configured (statusgate-cli config set document_url <url>)".into());
    }

    let draft = build_draft(&args)?;
    let store = HttpStore::with_timeout(
        &config.document_url,
        config.auth_token.clone(),
        config.timeout_secs,
    )?;

    let published = publish(&store, &draft).await?;
    println!(
        "published: active={} mode={} last_update={}",
        published.active,
        published.mode.as_str(),
        published.last_update
    );
    Ok(())
}

fn build_draft(args: &PublishArgs) -> Result<DraftFields, Box<dyn std::error::Error>> {
    if args.service_ok {
        return Ok(DraftFields {
            active: Some(false),
            mode: Some(Mode::None),
            ..Default::default()
        });
    }

    let mode = match &args.mode {
        Some(s) => Some(Mode::parse(s).ok_or_else(|| format!("invalid mode: {s}"))?),
        None => None,
    };

    let block_schedule = build_schedule(args)?;

    Ok(DraftFields {
        active: args.active,
        mode,
        apply_preset: args.preset.clone(),
        title: args.title.clone(),
        message: args.message.clone(),
        image: args.image.clone(),
        ok_delay_seconds: args.ok_delay,
        warning_click_message: args.click_message.clone(),
        block_schedule,
    })
}

fn build_schedule(args: &PublishArgs) -> Result<Option<BlockSchedule>, Box<dyn std::error::Error>> {
    let any_flag = args.schedule_enabled.is_some()
        || args.schedule_start.is_some()
        || args.schedule_end.is_some()
        || args.schedule_days.is_some();
    if !any_flag {
        return Ok(None);
    }

    let days = match &args.schedule_days {
        Some(s) if !s.trim().is_empty() => parse_days(s)?,
        _ => Vec::new(),
    };

    Ok(Some(BlockSchedule {
        enabled: args.schedule_enabled.unwrap_or(true),
        start: args.schedule_start.clone().unwrap_or_else(|| "00:00".to_string()),
        end: args.schedule_end.clone().unwrap_or_else(|| "00:00".to_string()),
        days,
    }))
}

fn parse_days(s: &str) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    s.split(',')
        .map(|d| {
            let d = d.trim();
            let n: u8 = d.parse().map_err(|_| format!("invalid day: {d}"))?;
            if n > 6 {
                return Err(format!("day out of range (0-6): {n}").into());
            }
            Ok(n)
        })
        .collect()
}
