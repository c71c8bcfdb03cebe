//! Interactive storefront cart client.
//!
//! Drives a [`CartEngine`] against a real cart service from the terminal:
//! browse-as-guest mutations persist to a local JSON file, `login` runs the
//! guest-cart merge, and authenticated mutations round-trip to the service.

mod config;

use std::sync::Arc;

use cart::{LineDraft, Money};
use common::LineId;
use engine::{CartEngine, CartView, SyncOutcome};
use remote::{HttpCartApi, InMemoryTokenStore, TokenStore};
use storage::JsonFileStore;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use config::Config;

const HELP: &str = "\
commands:
  list                                  show the cart
  add <ticket-type> <qty> <price> [name]  add tickets
  rm <line-id>                          remove a line
  qty <line-id> <n>                     set a line's quantity (0 removes)
  clear                                 empty the cart
  refresh                               re-fetch the authenticated cart
  login <token>                         sign in and merge the guest cart
  logout                                return to a fresh guest cart
  quit";

fn print_view(view: &CartView) {
    if view.lines.is_empty() {
        println!("cart is empty");
        return;
    }
    for line in &view.lines {
        println!(
            "  [{}] {} x{} @ {} = {}",
            line.line_id,
            line.ticket_type_name,
            line.quantity,
            line.unit_price,
            line.line_total()
        );
    }
    println!(
        "  {} tickets, total {}{}",
        view.item_count,
        view.total_amount,
        if view.is_syncing { " (syncing)" } else { "" }
    );
}

#[tokio::main]
async fn main() {
    let config = Config::from_env();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone())),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let tokens: Arc<InMemoryTokenStore> = Arc::new(match &config.token {
        Some(token) => InMemoryTokenStore::with_token(token.clone()),
        None => InMemoryTokenStore::new(),
    });
    let remote = HttpCartApi::new(config.api_base_url.clone(), tokens.clone() as Arc<dyn TokenStore>);
    let local = JsonFileStore::new(config.cart_path.clone());
    let engine = CartEngine::new(remote, local, tokens.clone() as Arc<dyn TokenStore>);

    tracing::info!(api = %config.api_base_url, cart_file = %config.cart_path, "storefront starting");
    if let Err(error) = engine.hydrate().await {
        tracing::warn!(%error, "initial cart hydration failed");
    }
    print_view(&engine.view());
    println!("type 'help' for commands");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let result = match parts.as_slice() {
            [] => continue,
            ["help"] => {
                println!("{HELP}");
                Ok(())
            }
            ["list"] => {
                print_view(&engine.view());
                Ok(())
            }
            ["add", ticket, qty, price, name @ ..] => {
                match (qty.parse::<u32>(), price.parse::<f64>()) {
                    (Ok(quantity), Ok(price)) => {
                        let name = if name.is_empty() {
                            ticket.to_string()
                        } else {
                            name.join(" ")
                        };
                        engine
                            .add_item(LineDraft::new(
                                *ticket,
                                name.clone(),
                                name,
                                "",
                                quantity,
                                Money::from_major(price),
                            ))
                            .await
                    }
                    _ => {
                        println!("usage: add <ticket-type> <qty> <price> [name]");
                        Ok(())
                    }
                }
            }
            ["rm", line_id] => engine.remove_item(&LineId::new(*line_id)).await,
            ["qty", line_id, n] => match n.parse::<u32>() {
                Ok(quantity) => engine.update_quantity(&LineId::new(*line_id), quantity).await,
                Err(_) => {
                    println!("usage: qty <line-id> <n>");
                    Ok(())
                }
            },
            ["clear"] => engine.clear().await,
            ["refresh"] => engine.refresh_from_remote().await,
            ["login", token] => {
                tokens.set_token(token.to_string());
                match engine.reconcile_on_login().await {
                    Ok(SyncOutcome::Completed(report)) => {
                        if report.is_partial() {
                            println!(
                                "signed in; {} of {} guest lines could not be merged",
                                report.failed, report.attempted
                            );
                        } else {
                            println!("signed in; {} guest lines merged", report.migrated);
                        }
                        Ok(())
                    }
                    Ok(SyncOutcome::AlreadyInFlight) => Ok(()),
                    Err(e) => Err(e),
                }
            }
            ["logout"] => {
                tokens.clear();
                engine.reset_to_guest().await;
                println!("signed out");
                Ok(())
            }
            ["quit"] | ["exit"] => break,
            _ => {
                println!("unknown command, try 'help'");
                Ok(())
            }
        };

        match result {
            Ok(()) => print_view(&engine.view()),
            Err(error) => println!("error: {error}"),
        }
    }
}
