use std::io;

use progshell::cli::Driver;
use progshell::infrastructure::ProcessExit;

fn main() {
    let exit = ProcessExit;
    let mut stdout = io::stdout();
    let mut stderr = io::stderr();

    let completion =
        Driver::new(&mut stdout, &mut stderr, &exit).execute(std::env::args_os().skip(1));

    // ProcessExit terminates before the driver returns
    std::process::exit(completion.code());
}
