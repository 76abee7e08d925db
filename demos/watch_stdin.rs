//! Example: Watching standard input with the readiness wait loop

use tutela::Fd;
use tutela::file;
use tutela::poll::{self, Interest, PollFd};

use std::time::Duration;

fn main() -> tutela::Result<()> {
    let stdin = Fd::from_raw(0);
    let mut set = [PollFd::new(stdin, Interest::IN)];

    println!("Type lines; 'quit', end of input, or 10 idle seconds stop the loop.");

    poll::wait(
        &mut set,
        Some(Duration::from_secs(10)),
        None,
        |set, keep_going| {
            if set[0].ready().is_empty() {
                println!("No input for 10 seconds, stopping.");
                *keep_going = false;
                return Ok(());
            }

            let mut buffer = [0u8; 256];
            let n = file::read(set[0].handle(), &mut buffer)?;

            if n == 0 {
                println!("End of input.");
                *keep_going = false;
                return Ok(());
            }

            let line = String::from_utf8_lossy(&buffer[..n]);

            if line.trim() == "quit" {
                *keep_going = false;
            } else {
                print!("echo: {line}");
            }

            Ok(())
        },
    )
}
