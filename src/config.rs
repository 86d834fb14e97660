use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use clap::Args;
use taxi_core::pagination::DEFAULT_PAGE_SIZE;
use taxi_core::Database;

const MEMORY: &str = ":memory:";

#[derive(Debug, Clone, Default, Args)]
pub struct DatabaseArgs {
    /// SQLite database file [default: taxi.db in the user data directory]
    ///
    /// `:memory:` gives a throwaway database.
    #[arg(long, value_name = "PATH")]
    pub db: Option<PathBuf>,
}

impl DatabaseArgs {
    /// Opens the configured database and brings its schema up to date.
    pub fn open(&self) -> anyhow::Result<Database> {
        let db = match &self.db {
            Some(path) if path.as_os_str() == MEMORY => Database::open_memory()?,
            Some(path) => Database::open(path)?,
            None => Database::open_default()?,
        };
        db.migrate()?;
        Ok(db)
    }
}

#[derive(Debug, Clone, Args)]
pub struct ServeArgs {
    /// Address to bind the HTTP API to
    #[arg(long, default_value_t = IpAddr::V4(Ipv4Addr::LOCALHOST))]
    pub host: IpAddr,

    /// Port for HTTP API
    #[arg(short, long, default_value_t = 3000)]
    pub port: u16,

    /// Rows per page in list endpoints
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: u32,

    #[command(flatten)]
    pub database: DatabaseArgs,
}

impl Default for ServeArgs {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 3000,
            page_size: DEFAULT_PAGE_SIZE,
            database: DatabaseArgs::default(),
        }
    }
}

impl ServeArgs {
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn open_database(&self) -> anyhow::Result<Database> {
        Ok(self.database.open()?.with_page_size(self.page_size))
    }
}

#[derive(Debug, Clone, Args)]
pub struct CreateDriverArgs {
    #[arg(long)]
    pub username: String,

    #[arg(long)]
    pub password: String,

    /// Three uppercase letters followed by five digits, e.g. ABC12345
    #[arg(long)]
    pub license_number: String,

    #[arg(long, default_value = "")]
    pub first_name: String,

    #[arg(long, default_value = "")]
    pub last_name: String,

    #[command(flatten)]
    pub database: DatabaseArgs,
}
