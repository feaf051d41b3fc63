//! Merge all UTXOs of one currency into a single output.
//!
//! Usage:
//!   PLASMA_PRIVATE_KEY=0x... cargo run --example consolidate -- <CURRENCY> [TARGET]
//!
//! With TARGET only the smallest UTXOs needed to reach it are merged.

use std::env;

fn main() {
    #[cfg(all(feature = "http", feature = "local-signer"))]
    {
        use plasma_utxo::{
            parse_address, parse_amount, ConsolidationState, Consolidator, LocalSigner, PlasmaApi, Signer,
            TransportType,
        };

        let args: Vec<String> = env::args().collect();
        if args.len() < 2 || args.len() > 3 {
            eprintln!("usage: consolidate <CURRENCY_0x...> [TARGET]");
            std::process::exit(1);
        }

        let currency = parse_address(&args[1]).expect("invalid currency address");
        let target = args.get(2).map(|t| parse_amount(t).expect("invalid target amount"));
        let key = env::var("PLASMA_PRIVATE_KEY").expect("set PLASMA_PRIVATE_KEY");
        let signer = LocalSigner::from_hex(&key).expect("invalid private key");

        let url = env::var("PLASMA_WATCHER_URL").unwrap_or_else(|_| "http://127.0.0.1:7434".into());
        let api = PlasmaApi::new(&TransportType::Http(url)).unwrap_or_else(|e| {
            eprintln!("failed to connect: {e}");
            std::process::exit(1);
        });

        let utxos = api.get_utxos(&signer.address()).expect("failed to fetch UTXOs");
        let mut consolidator = Consolidator::new(&api, signer.address(), currency, &utxos, target)
            .unwrap_or_else(|e| {
                eprintln!("nothing to consolidate: {e}");
                std::process::exit(1);
            });

        while consolidator.can_merge() {
            println!(
                "round {}: {} merge transactions",
                consolidator.round(),
                consolidator.transactions().len()
            );
            consolidator.sign_transactions(&signer).expect("signing failed");
            consolidator.process_transactions().expect("round failed");
        }

        match consolidator.state() {
            ConsolidationState::Converged => {
                let merged = consolidator.merged_utxo().expect("converged without a merged utxo");
                println!(
                    "merged into {}/{}/{} holding {:?}",
                    merged.blknum,
                    merged.txindex,
                    merged.oindex,
                    merged.amount()
                );
            }
            state => {
                eprintln!("consolidation ended {state:?}");
                for failed in consolidator.failed_submissions() {
                    eprintln!("  round {}: {}", failed.round, failed.error);
                }
                std::process::exit(1);
            }
        }
    }
    #[cfg(not(all(feature = "http", feature = "local-signer")))]
    {
        let _ = env::args();
        eprintln!("enable the 'http' and 'local-signer' features");
    }
}
