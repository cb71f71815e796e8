use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "signup", version, about = "Registration form front end")]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Cmd,
}

#[derive(Subcommand)]
pub enum Cmd {
    /// Fill in the form and submit it once
    Submit(SubmitArgs),
    /// Print the last accepted registration
    Show,
    /// Print how many users are already registered
    Count {
        /// Listing server, overrides `user_count.base_url`
        #[arg(long)]
        base_url: Option<String>,
    },
    /// Interactive session: edit fields, submit, watch notifications
    Session,
}

/// Missing flags leave the field empty, which the form then rejects.
#[derive(Args, Debug, Default)]
pub struct SubmitArgs {
    #[arg(long, default_value = "")]
    pub last_name: String,
    #[arg(long, default_value = "")]
    pub first_name: String,
    #[arg(long, default_value = "")]
    pub email: String,
    /// dd/mm/yyyy
    #[arg(long, default_value = "")]
    pub birthday: String,
    #[arg(long, default_value = "")]
    pub city: String,
    /// Five digit French postal code
    #[arg(long, default_value = "")]
    pub address_code: String,
}
