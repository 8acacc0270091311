pub mod handlers;

use crate::presentation::cli::{Cli, CodecCommands, Commands, RecordCommands};
use cadc_core::error::Result;
use cadc_core::{ArchiveCryptoEngine, FsRecordStore, Job, TaskRunner};
use std::sync::Arc;

/// Dispatch one command. `Ok(false)` means the operation ran and failed.
pub async fn run(cli: Cli) -> Result<bool> {
    let config = handlers::load_config(cli.root, cli.config)?;
    let store = Arc::new(FsRecordStore::new(&config));
    let runner = TaskRunner::new(
        Arc::new(ArchiveCryptoEngine::new(config)),
        store.clone(),
    );

    match cli.command {
        Commands::Encrypt {
            source,
            record,
            exponent,
        } => Ok(handlers::drive(
            &runner,
            Job::Encrypt {
                source,
                record,
                exponent,
            },
        )
        .await),
        Commands::Decrypt { archive, record } => {
            Ok(handlers::drive(&runner, Job::Decrypt { archive, record }).await)
        }
        Commands::Keygen { record, exponent } => {
            Ok(handlers::drive(&runner, Job::GenerateKey { record, exponent }).await)
        }
        Commands::Records(cmd) => match cmd {
            RecordCommands::List => handlers::handle_records_list(&store),
            RecordCommands::New {
                name,
                random,
                base,
                offset,
                precision,
                key_length,
            } => handlers::handle_records_new(&store, &name, random, base, offset, precision, key_length),
        },
        Commands::Codec(cmd) => match cmd {
            CodecCommands::Encode { digits } => handlers::handle_codec_encode(&digits),
            CodecCommands::Decode { tokens } => handlers::handle_codec_decode(&tokens),
        },
    }
}
