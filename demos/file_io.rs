//! Example: Defensive file write and read-back with Tutela

use tutela::Fd;
use tutela::file::{self, CREATE_FLAGS, READ_FLAGS};

use std::time::{SystemTime, UNIX_EPOCH};

fn main() -> tutela::Result<()> {
    // Generate a unique temporary file path
    let unique = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock drift")
        .as_nanos();

    let path = std::env::temp_dir().join(format!(
        "tutela-file-{}-{}.tmp",
        std::process::id(),
        unique
    ));
    let path = path.to_string_lossy().into_owned();

    // Create the file and write a greeting
    let mut fd = Fd::invalid();
    file::open(&path, CREATE_FLAGS, 0o644, &mut fd)?;
    let written = file::write_fmt(fd, format_args!("hello from pid {}\n", std::process::id()))?;
    file::close(&mut fd)?;

    println!("Wrote {} bytes to {}", written, path);

    // Read it back
    let mut fd = Fd::invalid();
    file::open(&path, READ_FLAGS, 0, &mut fd)?;

    let mut buffer = [0u8; 64];
    let n = file::read(fd, &mut buffer)?;
    file::close(&mut fd)?;

    println!("Read {} bytes: {}", n, String::from_utf8_lossy(&buffer[..n]));

    // Clean up the temporary file
    let _ = std::fs::remove_file(path);

    Ok(())
}
