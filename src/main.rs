use std::time::Duration;

use anyhow::{Context, Result};
use dydx_client::config::{mnemonic_from_env, Config};
use dydx_client::prelude::*;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    let config = Config::from_env().context("Failed to load config")?;
    config.logging.init();

    println!("dYdX v4 Rust Client - Network Validation Test");
    println!("=============================================");

    let mnemonic = mnemonic_from_env().context("Mnemonic is required")?;

    let mut client = DydxClient::builder(&config.node.rpc_url, &config.node.grpc_url)
        .chain_id(&config.node.chain_id)
        .address_prefix(&config.node.address_prefix)
        .timeout(Duration::from_secs(config.node.timeout_secs))
        .gas_limit(config.tx.gas_limit)
        .gas_adjustment(config.tx.gas_adjustment)
        .memo(&config.tx.memo)
        .submission_mode(config.submission.mode)
        .connect(&mnemonic)
        .await
        .context("Failed to create client")?;
    drop(mnemonic);

    println!("Client address: {}", client.address());

    let status = client.status().await.context("Failed to connect to node")?;
    println!("\nNode connection successful");
    println!("Chain ID: {}", status.chain_id);
    println!("Latest Block Height: {}", status.latest_block_height);
    println!("Latest Block Time: {}", status.latest_block_time);
    if status.catching_up {
        println!("Warning: node is still catching up");
    }

    println!("\nGetting account info...");
    let account = client
        .update_account_info()
        .await
        .context("Failed to get account info")?;
    println!("Account found");
    println!("Account Number: {}", account.account_number);
    println!("Sequence: {}", account.sequence);

    println!("\nPlacing perpetual order...");
    let params = OrderParams {
        clob_pair_id: config.order.clob_pair_id,
        side: config.order.order_side()?,
        quantums: size_to_quantums(config.order.size, config.order.step_size),
        subticks: price_to_subticks(config.order.price, config.order.tick_size),
        good_til_block: OrderParams::expiry_from(status.latest_block_height, config.order.expiry_blocks),
        subaccount_number: 0,
    };

    println!("Order Parameters:");
    println!("  Market: {}", params.clob_pair_id);
    println!("  Side: {}", params.side);
    println!("  Size: {} quantums (~{} base)", params.quantums, config.order.size);
    println!("  Price: {} subticks (~{} quote)", params.subticks, config.order.price);
    println!("  Expires at block: {}", params.good_til_block);

    let result = client.place_order(&params).await;
    let placement = match result {
        Ok(placement) => placement,
        Err(e) => {
            error!(error = %e, "Order placement failed");
            println!("Failed to place order: {}", e);
            println!("Validated so far: network connection, account discovery, order parameters");
            client.close();
            return Ok(());
        }
    };

    print_placement(&placement);
    client.close();

    info!("Network validation complete");
    println!("\nNetwork validation complete");
    Ok(())
}

fn print_placement(placement: &OrderPlacement) {
    let response = &placement.response;

    println!("\nClient ID: {}", placement.client_id);
    println!("Envelope: {} message(s), {} bytes", placement.envelope.messages().len(), placement.envelope.encoded_len());

    if !placement.broadcast {
        println!("Result: UNSIGNED — not broadcast");
        println!("Transaction hash: {}", response.txhash);
        println!("Order message validated and transaction built; signing was not performed.");
        return;
    }

    println!("Transaction hash: {}", response.txhash);
    println!("Gas used: {}", response.gas_used);
    println!("Gas wanted: {}", response.gas_wanted);

    if !response.is_success() {
        println!(
            "Transaction failed with code {} ({}): {}",
            response.code, response.codespace, response.raw_log
        );
        return;
    }

    println!("Transaction accepted by CheckTx");
    if response.height > 0 {
        println!("Block height: {}", response.height);
    }
    for (i, event) in response.events.iter().enumerate() {
        println!("Event {}: {}", i + 1, event.kind);
        for attr in &event.attributes {
            println!("  {}: {}", attr.key, attr.value);
        }
    }
}
