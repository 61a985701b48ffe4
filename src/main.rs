//! botstate console driver
//!
//! Runs a small order flow against the configured session backend. Every line
//! read from stdin is stored in the `last_input` field and the user's current
//! state is executed; queued messages are printed afterwards.

use anyhow::Context;
use futures::FutureExt;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};

use botstate::{
    config::Settings,
    state::{Bot, HandlerFuture, State},
    storage::CURRENT_STATE,
    utils::logging,
};

const LAST_INPUT: &str = "last_input";
const ENTRY_STATE: &str = "start";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new().context("failed to load settings")?;
    settings.validate()?;

    // Initialize logging
    let _guard = logging::init_logging(&settings.logging)?;

    let user_id = std::env::args().nth(1).unwrap_or_else(|| "1".to_string());
    info!(user_id = %user_id, backend = ?settings.storage.backend, "Starting botstate console");

    let mut bot = Bot::from_settings(&settings, order_flow()).await?;
    bot.user(&user_id).await?;

    println!("Type a message, or /reset, /forget, /data, /quit");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim().to_string();

        match line.as_str() {
            "/quit" => break,
            "/reset" => {
                bot.session_mut().clear_control_fields().await?;
                println!("Flow position cleared");
                continue;
            }
            "/forget" => {
                bot.session_mut().clear_all().await?;
                bot.user(&user_id).await?;
                println!("All data cleared");
                continue;
            }
            "/data" => {
                let data = bot.session_mut().get_all_fields().await?;
                println!("{}", serde_json::to_string_pretty(&data)?);
                continue;
            }
            _ => {}
        }

        bot.session_mut().set_field(LAST_INPUT, line).await?;

        let current = bot
            .session()
            .current_value(CURRENT_STATE)
            .unwrap_or(ENTRY_STATE)
            .to_string();

        if let Err(e) = bot.execute_state(&current).await {
            error!(user_id = %user_id, state = %current, error = %e, "State execution failed");
            println!("Something went wrong: {}", e);
        }

        for message in bot.take_messages() {
            println!("> {}", message);
        }
    }

    info!("botstate console stopped");
    Ok(())
}

/// Registry of the demo order flow
fn order_flow() -> Vec<State> {
    vec![
        State::new("start")
            .with_run(ask_product)
            .with_callback(read_product)
            .with_next("quantity"),
        State::new("quantity")
            .with_run(ask_quantity)
            .with_callback(read_quantity)
            .with_next("confirmation"),
        State::new("confirmation")
            .with_run(ask_confirmation)
            .with_callback(read_confirmation)
            .with_next("done"),
        State::new("done").with_run(place_order),
    ]
}

fn last_input(bot: &Bot) -> String {
    bot.session().current_value(LAST_INPUT).unwrap_or_default().to_string()
}

fn ask_product(bot: &mut Bot) -> HandlerFuture<'_> {
    async move {
        bot.add_messages(["Hi! Which product would you like to order?"])?;
        Ok(true)
    }
    .boxed()
}

fn read_product(bot: &mut Bot) -> HandlerFuture<'_> {
    async move {
        let input = last_input(bot);
        if input.is_empty() {
            bot.add_messages(["Please tell me the product name."])?;
            return Ok(false);
        }

        bot.session_mut().set_field("product_name", input).await?;
        Ok(true)
    }
    .boxed()
}

fn ask_quantity(bot: &mut Bot) -> HandlerFuture<'_> {
    async move {
        let product = bot.session().current_value("product_name").unwrap_or_default().to_string();
        bot.add_messages([format!("How many {} do you need?", product)])?;
        Ok(true)
    }
    .boxed()
}

fn read_quantity(bot: &mut Bot) -> HandlerFuture<'_> {
    async move {
        match last_input(bot).parse::<u32>() {
            Ok(quantity) if quantity > 0 => {
                bot.session_mut().set_field("quantity", quantity.to_string()).await?;
                Ok(true)
            }
            _ => {
                bot.add_messages(["Please send a positive number."])?;
                Ok(false)
            }
        }
    }
    .boxed()
}

fn ask_confirmation(bot: &mut Bot) -> HandlerFuture<'_> {
    async move {
        let session = bot.session();
        let summary = format!(
            "{} x {}. Reply yes to confirm or no to start over.",
            session.current_value("quantity").unwrap_or_default(),
            session.current_value("product_name").unwrap_or_default(),
        );
        bot.add_messages([summary])?;
        Ok(true)
    }
    .boxed()
}

fn read_confirmation(bot: &mut Bot) -> HandlerFuture<'_> {
    async move {
        match last_input(bot).to_lowercase().as_str() {
            "yes" => Ok(true),
            "no" => {
                bot.session_mut().clear_control_fields().await?;
                bot.add_messages(["Order discarded."])?;
                // jump back to the beginning of the flow
                bot.execute_state(ENTRY_STATE).await?;
                Ok(false)
            }
            _ => {
                bot.add_messages(["Please reply yes or no."])?;
                Ok(false)
            }
        }
    }
    .boxed()
}

fn place_order(bot: &mut Bot) -> HandlerFuture<'_> {
    async move {
        bot.add_messages(["Order placed, thank you!"])?;
        bot.session_mut().clear_control_fields().await?;
        Ok(true)
    }
    .boxed()
}
