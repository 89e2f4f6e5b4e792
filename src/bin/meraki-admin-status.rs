use anyhow::Result;
use meraki_admin_status::{
    cli::{actions, actions::Action, start},
    meraki::status::AdminStatus,
};
use std::process::ExitCode;

// Main function
#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,

        // Failures outside the lookup itself (unreadable or malformed stdin)
        // still print the error-shaped JSON before exiting non-zero
        Err(error) => {
            let result = AdminStatus::failure(format!("Script execution error: {error}"));

            println!("{}", result.to_json_line());

            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    // Start the program
    let action = start()?;

    // Handle the action
    match action {
        Action::Check => actions::check::handle(action).await?,
    }

    Ok(())
}
