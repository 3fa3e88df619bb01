use std::process::ExitCode;

fn main() -> ExitCode {
    relaymq::app::startup::startup()
}
