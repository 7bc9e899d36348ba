//! # Interactive Shell
//!
//! Terminal presentation layer for the checkout demo. Owns no state:
//! it parses commands, forwards them to the `OrderController`, and
//! renders the snapshots the controller hands back.

use shop_core::{CartObserver, CartSnapshot, OrderController, PaymentIntent, ShopError};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

/// Observer that logs every state change
pub struct LoggingObserver;

impl CartObserver for LoggingObserver {
    fn on_cart_changed(&self, snapshot: &CartSnapshot) {
        info!("Cart changed: total={}", snapshot.formatted_total);
    }

    fn on_intent_synced(&self, intent: &PaymentIntent) {
        info!("Payment intent synced: id={}, amount={}", intent.id, intent.amount);
    }

    fn on_sync_error(&self, error: &ShopError) {
        warn!("Payment intent sync failed: {}", error);
    }
}

/// A parsed shell command
#[derive(Debug, PartialEq)]
enum Command {
    /// `set <product-id> <quantity>`
    Set { product_id: String, raw: String },
    /// `ship <option-id>`
    Ship { option_id: String },
    /// `total`
    Total,
    /// `pay <source-token>`
    Pay { source: String },
    /// `help`
    Help,
    /// `quit`
    Quit,
}

impl Command {
    fn parse(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace();
        match parts.next()? {
            "set" => Some(Command::Set {
                product_id: parts.next()?.to_string(),
                raw: parts.next().unwrap_or("").to_string(),
            }),
            "ship" => Some(Command::Ship {
                option_id: parts.next()?.to_string(),
            }),
            "total" => Some(Command::Total),
            "pay" => Some(Command::Pay {
                source: parts.next().unwrap_or("tok_visa").to_string(),
            }),
            "help" => Some(Command::Help),
            "quit" | "exit" => Some(Command::Quit),
            _ => None,
        }
    }
}

fn print_catalog(controller: &OrderController) {
    let Some(catalog) = controller.catalog() else {
        return;
    };
    println!("Products:");
    for product in &catalog.products {
        let price = product
            .first_sku()
            .map(|sku| sku.unit_price().display())
            .unwrap_or_else(|_| "-".to_string());
        println!("  {:<16} {:<28} {}", product.id, product.name, price);
    }
    println!();
}

fn print_snapshot(snapshot: &CartSnapshot) {
    for item in &snapshot.items {
        if item.quantity > 0 {
            println!(
                "  {} × {} @ {} = {}",
                item.quantity,
                item.name,
                item.unit_price.display(),
                item.total().display()
            );
        }
    }
    println!("Total: {}   [{}]", snapshot.formatted_total, snapshot.pay_label);
}

fn print_help() {
    println!("Commands:");
    println!("  set <product-id> <quantity>   update a quantity");
    println!("  ship <option-id>              select a shipping option");
    println!("  total                         show the current total");
    println!("  pay [source-token]            charge the current total");
    println!("  quit                          leave the store");
}

/// Run the interactive loop until `quit` or EOF
pub async fn run(controller: OrderController) -> anyhow::Result<()> {
    print_catalog(&controller);
    print_help();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let Some(command) = Command::parse(&line) else {
            if !line.trim().is_empty() {
                println!("Unknown command; try `help`");
            }
            continue;
        };

        match command {
            Command::Set { product_id, raw } => match controller.set_quantity(&product_id, &raw) {
                Ok(snapshot) => {
                    print_snapshot(&snapshot);
                    // Reconcile the backend intent off the input loop;
                    // failures are reported through the observer
                    let sync = controller.clone();
                    tokio::spawn(async move {
                        let _ = sync.sync_payment_intent().await;
                    });
                }
                Err(err) => println!("{}", err),
            },
            Command::Ship { option_id } => {
                let option = controller
                    .config()
                    .and_then(|c| c.shipping_options.into_iter().find(|o| o.id == option_id));
                match option {
                    Some(option) => {
                        println!("Shipping: {} ({})", option.label, option_id);
                        controller.select_shipping(option);
                    }
                    None => println!("Unknown shipping option: {}", option_id),
                }
            }
            Command::Total => match controller.snapshot() {
                Ok(snapshot) => print_snapshot(&snapshot),
                Err(err) => println!("{}", err),
            },
            Command::Pay { source } => match controller.create_charge(&source).await {
                Ok(charge) => println!(
                    "Charge {}: {} ({})",
                    charge.id,
                    shop_core::Price::from_cents(charge.amount, charge.currency).display(),
                    charge.status.as_deref().unwrap_or("unknown")
                ),
                Err(err) => println!("Charge failed: {}", err),
            },
            Command::Help => print_help(),
            Command::Quit => break,
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_set() {
        assert_eq!(
            Command::parse("set increment 3"),
            Some(Command::Set {
                product_id: "increment".to_string(),
                raw: "3".to_string(),
            })
        );
        // Missing quantity coerces to empty, which the controller stores as 0
        assert_eq!(
            Command::parse("set increment"),
            Some(Command::Set {
                product_id: "increment".to_string(),
                raw: String::new(),
            })
        );
    }

    #[test]
    fn test_parse_misc() {
        assert_eq!(Command::parse("total"), Some(Command::Total));
        assert_eq!(Command::parse("quit"), Some(Command::Quit));
        assert_eq!(Command::parse("exit"), Some(Command::Quit));
        assert_eq!(Command::parse("gibberish"), None);
        assert_eq!(Command::parse(""), None);
    }

    #[test]
    fn test_parse_pay_default_source() {
        assert_eq!(
            Command::parse("pay"),
            Some(Command::Pay {
                source: "tok_visa".to_string(),
            })
        );
    }
}
