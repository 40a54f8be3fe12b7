use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{bail, Result};
use clap::Parser;
use devflow::cmds::{App, RootMod};
use devflow::conductors::Conductor;
use devflow::handlers::Handler;
use tokio::io::{stdin, stdout, BufReader};
use tracing_subscriber::EnvFilter;

async fn build_handler(app: &App) -> Result<Handler> {
    if app.in_memory {
        tracing::info!("using in-memory storage");
        return Ok(devflow::in_memory());
    }

    let uri = match app.mongodb_uri.as_deref() {
        Some(uri) => uri,
        None => bail!("either `--in-memory` or `--mongodb-uri` (or `DEVFLOW_MONGODB_URI`) is needed."),
    };

    devflow::mongo(uri, &app.database).await
}

async fn async_main(app: App) -> Result<()> {
    let conductor = Conductor {
        handler: build_handler(&app).await?,
    };

    match app.cmd {
        RootMod::Script =>
            conductor
                .run_script(BufReader::new(stdin()), stdout())
                .await,
        cmd => {
            let v = conductor.conduct(cmd).await?;
            println!("{}", serde_json::to_string_pretty(&v)?);
            Ok(())
        },
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("devflow=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let app = App::parse();

    static NUM: AtomicUsize = AtomicUsize::new(0);

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name_fn(|| format!("devflow-worker-{}", NUM.fetch_add(1, Ordering::SeqCst)))
        .build()
    {
        Ok(r) => r,
        Err(e) => return eprintln!("{}", e),
    };

    if let Err(e) = rt.block_on(async_main(app)) {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}
