use clap::Subcommand;
use statusgate_core::{live_config, Config, LiveConfig, Viewer};

#[derive(Subcommand)]
pub enum StatusAction {
    /// Fetch and print the current document
    Show {
        /// Print the full normalized document as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run the overlay policy engine and print its decision
    Preview {
        /// Evaluate at this time instead of now (RFC 3339 or YYYY-MM-DDTHH:MM)
        #[arg(long)]
        at: Option<String>,
    },
}

pub async fn run(action: StatusAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load();
    if config.document_url.is_empty() {
        return Err("document_url is not configured (statusgate-cli config set document_url <url>)".into());
    }
    let viewer = Viewer::new(&config.document_url);

    match action {
        StatusAction::Show { json } => {
            let doc = viewer.fetch_document().await?;
            if json {
                println!("{}", doc.to_canonical_json()?);
                return Ok(());
            }
            println!("active:       {}", if doc.active { "yes" } else { "no" });
            println!("mode:         {}", doc.mode.as_str());
            println!("last update:  {}", doc.last_update);
            match live_config(&doc) {
                Some(LiveConfig::Info(cfg)) => {
                    println!("title:        {}", cfg.title);
                    println!("message:      {}", cfg.message);
                    println!("ok delay:     {}s", cfg.ok_delay_seconds);
                }
                Some(LiveConfig::Warning(cfg)) => {
                    println!("title:        {}", cfg.title);
                    println!("message:      {}", cfg.message);
                    println!("click notice: {}", cfg.warning_click_message);
                    let s = &cfg.block_schedule;
                    if s.enabled {
                        println!("block window: {} -> {} days {:?}", s.start, s.end, s.days);
                    } else {
                        println!("block window: permanent (schedule disabled)");
                    }
                }
                None => println!("overlay:      none (service OK)"),
            }
        }
        StatusAction::Preview { at } => {
            let now = super::parse_at(at.as_deref())?;
            let decision = viewer.decision_at(now).await;
            println!("{}", serde_json::to_string_pretty(&decision)?);
        }
    }
    Ok(())
}
