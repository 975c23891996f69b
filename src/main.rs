use std::process::ExitCode;

use exact_io::fs::file::{File, Origin};
use exact_io::fs::{TransferRequest, TransferStatus, transfer};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
        .with_writer(std::io::stderr)
        .init();

    let path = std::env::temp_dir().join(format!("exact-io-demo-{}", std::process::id()));

    println!("\n[Write]\n");

    let file = match File::options().read_write().create_or_empty().mode(0o664).open(&path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("error opening {}: {e}", path.display());
            return ExitCode::FAILURE;
        },
    };

    let data = b"This is a good string\0";
    let result = file.write_all(data);
    println!("{:?}", result);

    if let Err(e) = file.sync_data() {
        eprintln!("sync failed: {e}");
    }

    println!("\n[Read]\n");

    if let Err(e) = file.seek(0, Origin::Start) {
        eprintln!("seek failed: {e}");
        return ExitCode::FAILURE;
    }

    let mut buf = [0_u8; 100];
    let result = transfer(TransferRequest::read(&file, &mut buf));
    println!("{:?}", result);
    println!("{:?}", String::from_utf8_lossy(&buf[..result.bytes_transferred]));

    println!("\n[Gap]\n");

    if let Err(e) = file.resize(4096) {
        eprintln!("resize failed: {e}");
    }
    let mut gap = [0xff_u8; 8];
    let result = file.read_exact_at(&mut gap, 1024);
    println!("{:?}, {:?}", result, gap);

    if let Err(e) = file.close() {
        eprintln!("close failed: {e}");
    }
    if let Err(e) = std::fs::remove_file(&path) {
        eprintln!("error removing {}: {e}", path.display());
    }

    match result.status {
        TransferStatus::Error(_) => ExitCode::FAILURE,
        _ => ExitCode::SUCCESS,
    }
}
