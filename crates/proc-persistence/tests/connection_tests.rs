//! Pruebas de pool y configuración (requieren un DATABASE_URL accesible).

use diesel::connection::SimpleConnection;
use proc_persistence::{build_pool, DbConfig};

#[test]
fn create_pool_from_env_runs_migrations() {
    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("DATABASE_URL not set: skipping");
        return;
    }
    let cfg = DbConfig::from_env().expect("db config");
    let pool = build_pool(&cfg.url, cfg.min_connections, cfg.max_connections).expect("pool");
    let mut conn = pool.get().expect("conn");
    conn.batch_execute("SELECT nextval('deployment_id_seq');").expect("sequence exists");
    conn.batch_execute("SELECT count(*) FROM deployment_resources;").expect("resources table exists");
}
