use std::collections::hash_map::DefaultHasher;
use std::fs::File;
use std::hash::{Hash, Hasher};
use std::io::BufReader;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver};
use std::time::SystemTime;
use std::{env, thread};

use deposit_status::config::NetworkConfig;
use deposit_status::deposit::{Deposit, DepositRow};
use deposit_status::error::Error;
use deposit_status::snapshot::SnapshotMap;
use deposit_status::status::{DepositOutput, StatusResolver, unix_seconds};
use log::{debug, error, info, warn};
use serde_json::Value;

const WORKER_COUNT: usize = 4;

fn worker_loop(rx: Receiver<DepositRow>, resolver: Arc<StatusResolver>, now: u64) -> SnapshotMap {
    let mut snapshots = SnapshotMap::new();

    // Blocks until message or channel closed (sender dropped)
    while let Ok(row) = rx.recv() {
        let id = row.id().to_string();
        // Resolve before storing so an undisplayable update keeps the previous snapshot
        let resolved = Deposit::try_from(row).and_then(|deposit| resolver.resolve(&deposit, now));
        let view = match resolved {
            Ok(view) => view,
            Err(e) => {
                error!("Rejected deposit {}: {}", id, e);
                continue;
            }
        };
        debug!("Resolved: {:?}", view);

        if let Some(previous) = snapshots.insert(view) {
            warn!(
                "Deposit {} snapshot replaced, previous state {}",
                id,
                previous.state()
            );
        }
    }

    snapshots
}

fn shard(id: &str) -> usize {
    let mut hasher = DefaultHasher::new();
    id.hash(&mut hasher);
    (hasher.finish() % WORKER_COUNT as u64) as usize
}

fn main() -> Result<(), Error> {
    env_logger::init();

    let path = env::args().nth(1).ok_or(Error::MissingArgument)?;
    info!("Reading deposit snapshots from: {}", path);

    let config = NetworkConfig::from_env()?;
    let resolver = Arc::new(StatusResolver::new(config.vending_machine));
    let now = unix_seconds(SystemTime::now())?;

    let file = File::open(&path)?;
    let values = serde_json::Deserializer::from_reader(BufReader::new(file)).into_iter::<Value>();

    let (senders, receivers): (Vec<_>, Vec<_>) = (0..WORKER_COUNT)
        .map(|_| mpsc::channel::<DepositRow>())
        .unzip();

    let handles: Vec<_> = receivers
        .into_iter()
        .map(|rx| {
            let resolver = Arc::clone(&resolver);
            thread::spawn(move || worker_loop(rx, resolver, now))
        })
        .collect();

    for result in values {
        // Malformed JSON leaves the stream unrecoverable
        let value = match result {
            Ok(v) => v,
            Err(e) => {
                error!("Stopped reading snapshots: {}", e);
                break;
            }
        };

        let row: DepositRow = match serde_json::from_value(value) {
            Ok(r) => r,
            Err(e) => {
                error!("Failed to decode deposit snapshot: {}", e);
                continue;
            }
        };

        // Same id always goes to the same worker so snapshots stay in arrival order
        let worker_idx = shard(row.id());
        {
            let sender = &senders[worker_idx];
            if let Err(e) = sender.send(row) {
                error!("Failed to send snapshot to worker {}: {}", worker_idx, e);
            }
        }
    }

    // Explicit drop to avoid another closure and a dedicated thread
    drop(senders);

    let snapshots = handles
        .into_iter()
        .filter_map(|h| match h.join() {
            Ok(snapshots) => Some(snapshots),
            Err(_) => {
                error!("Worker thread panicked");
                None
            }
        })
        .fold(SnapshotMap::new(), |mut merged, shard| {
            merged.merge(shard);
            merged
        });

    info!("Processing complete. {} deposits.", snapshots.len());
    if snapshots.is_empty() {
        warn!("No displayable deposits in {}", path);
    }

    let mut wtr = csv::Writer::from_writer(std::io::stdout());
    for view in snapshots.into_iter_sorted() {
        wtr.serialize(DepositOutput::new(view, &config))?;
    }
    wtr.flush()?;

    Ok(())
}
