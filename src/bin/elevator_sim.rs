use elevator_dispatch::services::dispatch::{CommandService, command_service};
use elevator_dispatch::{ElevatorSystem, SystemConfig};
use log::{info, warn};
use std::env;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tower::{Service, ServiceExt};

async fn handle(svc: &mut CommandService, line: String) {
    let line = line.trim().to_string();
    if line.is_empty() {
        return;
    }
    let reply = match svc.ready().await {
        Ok(svc) => svc.call(line).await,
        Err(e) => Err(e),
    };
    match reply {
        Ok(reply) => print!("{}", with_newline(reply)),
        Err(e) => {
            warn!("command failed: {e}");
            println!("Error: {e}");
        }
    }
}

fn with_newline(mut reply: String) -> String {
    if !reply.ends_with('\n') {
        reply.push('\n');
    }
    reply
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = SystemConfig::from_env();
    info!("starting with {config:?}");
    let system = Arc::new(ElevatorSystem::new(config));
    let mut svc = command_service(Arc::clone(&system));

    // Anything typed at runtime can also be given up front.
    for arg in env::args().skip(1) {
        handle(&mut svc, arg).await;
    }

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<String>();
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if tx.send(line).is_err() {
                break;
            }
        }
    });

    let mut ticker = tokio::time::interval(config.tick);
    let mut last_report = String::new();

    while system.is_running().await {
        tokio::select! {
            Some(line) = rx.recv() => handle(&mut svc, line).await,
            _ = ticker.tick() => {
                let report = system.report_status().await;
                if report != last_report {
                    print!("{report}");
                    last_report = report;
                }
            }
        }
    }

    system.wait_offline().await?;
    print!("{}", system.report_status().await);
    println!("ElevatorSystem Offline.");
    Ok(())
}
