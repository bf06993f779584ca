//! Operator console: reads commands from the server's stdin and prints the
//! responses.
//!
//! This is a trusted, local-only control surface; it never goes over the
//! public protocol.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};

use crate::usecase::OperatorUseCase;

/// Spawn the stdin console loop. Ends when stdin closes.
pub fn spawn_console(operator: Arc<OperatorUseCase>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    let response = operator.dispatch(line).await;
                    println!("{response}");
                }
                Ok(None) => {
                    tracing::debug!("console stdin closed");
                    break;
                }
                Err(e) => {
                    tracing::warn!("console read error: {e}");
                    break;
                }
            }
        }
    })
}
