use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "expenses", about = "Track personal expenses", disable_version_flag = true)]
pub struct Args {
    /// Optional config file path (TOML).
    #[arg(long, global = true)]
    pub config: Option<String>,
    /// Override the backend base URL.
    #[arg(long, global = true)]
    pub base_url: Option<String>,
    /// Override the local session store file.
    #[arg(long, global = true)]
    pub store: Option<String>,
    /// Override the log level (e.g. debug).
    #[arg(long, global = true)]
    pub log_level: Option<String>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in and remember the session.
    Login {
        username: String,
        #[arg(long, env = "EXPENSES_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account and log in as it.
    Signup {
        username: String,
        #[arg(long, env = "EXPENSES_PASSWORD", hide_env_values = true)]
        password: String,
    },
    Logout,
    /// Show who is logged in.
    Whoami,
    /// List your expenses.
    List,
    Show {
        id: String,
    },
    Add {
        name: String,
        amount: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long)]
        category: Option<String>,
        /// RFC3339 timestamp; defaults to now.
        #[arg(long)]
        date: Option<String>,
    },
    /// Change the given fields of an expense.
    Edit {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        amount: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        date: Option<String>,
    },
    Delete {
        id: String,
    },
    /// Totals by category and month.
    Summary,
    /// Run the in-process mock backend.
    Serve {
        #[arg(long, default_value_t = 3000)]
        port: u16,
    },
}
