use mts_wallet_core::WalletCoreConfig;

fn main() {
    let config = match WalletCoreConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };
    let network = &config.network;

    println!("MTS Wallet Core Network Configuration:\n");
    println!("  Chain: {} ({} / {})", network.name, network.chain_id, network.chain_id_hex());
    println!("  RPC URL: {}", network.rpc_url);
    println!(
        "  Native Currency: {} ({}, {} decimals)",
        network.native_currency.name, network.native_currency.symbol, network.native_currency.decimals
    );
    println!("  Block Explorer: {}", network.block_explorer);
    println!("  Factory: {:?}", config.factory_address);
    println!("  Fee Variant: {}", config.fee_variant.as_str());
    match &config.wrapped_token {
        Some(wrapped) => println!("  Wrapped Token: {} at {:?}", wrapped.symbol, wrapped.address),
        None => println!("  Wrapped Token: (not set)"),
    }
    println!(
        "  Wallet Endpoint: {}",
        config.wallet_endpoint.as_deref().unwrap_or("(not set)")
    );
}
