//! Send a fungible transfer on the child chain.
//!
//! Usage:
//!   PLASMA_PRIVATE_KEY=0x... cargo run --example send -- <RECIPIENT> <CURRENCY> <AMOUNT>
//!
//! The watcher URL is taken from `PLASMA_WATCHER_URL` (default
//! `http://127.0.0.1:7434`). Use the zero address as currency for ETH.

use std::env;

fn main() {
    #[cfg(all(feature = "http", feature = "local-signer"))]
    {
        use plasma_utxo::{parse_address, parse_amount, LocalSigner, PlasmaApi, PlasmaError, Signer, TransportType};

        let args: Vec<String> = env::args().collect();
        if args.len() != 4 {
            eprintln!("usage: send <RECIPIENT_0x...> <CURRENCY_0x...> <AMOUNT>");
            std::process::exit(1);
        }

        let recipient = parse_address(&args[1]).unwrap_or_else(|e| exit(e));
        let currency = parse_address(&args[2]).unwrap_or_else(|e| exit(e));
        let amount = parse_amount(&args[3]).unwrap_or_else(|e| exit(e));

        let key = env::var("PLASMA_PRIVATE_KEY").unwrap_or_else(|_| {
            eprintln!("set PLASMA_PRIVATE_KEY");
            std::process::exit(1);
        });
        let signer = LocalSigner::from_hex(&key).unwrap_or_else(|e| exit(e));

        let url = env::var("PLASMA_WATCHER_URL").unwrap_or_else(|_| "http://127.0.0.1:7434".into());
        let api = PlasmaApi::new(&TransportType::Http(url)).unwrap_or_else(|e| exit(e));

        println!("from:     {:?}", signer.address());
        println!("to:       {recipient:?}");
        println!("currency: {currency:?}");
        println!("amount:   {amount}");

        match api.transfer(&signer, &recipient, &currency, amount) {
            Ok(receipt) => {
                println!("txhash:   {:?}", receipt.txhash);
                println!("block:    {} (tx index {})", receipt.blknum, receipt.txindex);
            }
            Err(PlasmaError::InsufficientSingleTxFunds { .. }) => {
                eprintln!("funds are spread over too many UTXOs, run the consolidate example first");
                std::process::exit(1);
            }
            Err(e) => exit(e),
        }

        fn exit(e: PlasmaError) -> ! {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    }
    #[cfg(not(all(feature = "http", feature = "local-signer")))]
    {
        let _ = env::args();
        eprintln!("enable the 'http' and 'local-signer' features");
    }
}
