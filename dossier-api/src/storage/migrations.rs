use refinery::embed_migrations;

embed_migrations!("src/storage/migrations");

/// Creates or upgrades the dossier tables.
pub fn run_migrations<C>(conn: &mut C) -> anyhow::Result<()>
where
    C: refinery::Migrate,
{
    migrations::runner().run(conn)?;
    Ok(())
}
