use crate::config::Config;
use crate::db::log;
use crate::errors::AppResult;

use crate::cli::parser::Cli;
use crate::db::initialize::init_db;
use crate::db::pool::DbPool;

/// Handle the `init` command
///
/// This initializes:
///  - the config directory (if missing)
///  - the configuration file
///  - the SQLite database (prod or test mode)
///  - all pending DB migrations
pub fn handle(cli: &Cli) -> AppResult<()> {
    //
    // 1️⃣ PREPARA CONFIGURAZIONE
    //
    // In test mode il file di configurazione non viene scritto:
    // il DB è quello passato con --db.
    //
    let cfg = Config::init_all(cli.db.clone(), cli.test)?;
    let db_path = cfg.database.clone();

    println!("⚙️  Initializing rAttendance…");
    if !cli.test {
        println!("📄 Config file : {}", Config::config_file().display());
    }
    println!("🗄️  Database   : {}", &db_path);

    //
    // 2️⃣ APERTURA DB + MIGRAZIONI
    //
    let pool = DbPool::new(&db_path)?;
    init_db(&pool.conn)?;

    println!("✅ Database initialized at {}", &db_path);

    //
    // 3️⃣ LOG INTERNO (non bloccante)
    //
    log::ttlog_soft(
        &pool.conn,
        "init",
        "Database initialized",
        &format!("Database initialized at {}", &db_path),
    );

    println!("🎉 rAttendance initialization completed!");
    Ok(())
}
