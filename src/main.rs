use std::process::ExitCode;

fn main() -> ExitCode {
    hyperload::entry::run()
}
