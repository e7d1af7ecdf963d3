//! Bulk load and bulk delete of a vector table

use std::sync::Arc;

use tracing::info;

use crate::cli::commands::DeleteArgs;
use crate::cli::commands::WriteArgs;
use crate::cli::output::creating_table_message;
use crate::cli::output::deleting_table_message;
use crate::cli::output::documents_written_message;
use crate::cli::output::table_deleted_message;
use crate::connections::ConnectionFactory;
use crate::documents::CsvLoader;
use crate::documents::Filter;
use crate::vectorstore::VectorStore;
use crate::AppConfig;
use crate::Result;
use crate::DEFAULT_EMBEDDING_MODEL;

/// Load every CSV row and insert the documents in one call, returning the count the store wrote
pub async fn write_documents<S>(store: &S, loader: &CsvLoader) -> Result<usize>
where
    S: VectorStore + ?Sized,
{
    let documents = loader.load()?;
    info!(
        "Writing {} documents from {}",
        documents.len(),
        loader.path().display()
    );
    store.add_documents(&documents).await
}

/// Remove every row of the store
pub async fn delete_all_documents<S>(store: &S) -> Result<u64>
where
    S: VectorStore + ?Sized,
{
    store.delete(&Filter::new()).await
}

pub async fn handle_write_command(config: Arc<AppConfig>, args: &WriteArgs) -> Result<usize> {
    println!("{}", creating_table_message(&args.table_name));

    let factory = ConnectionFactory::new(config);
    let store = factory
        .create_vector_store_client(&args.table_name, DEFAULT_EMBEDDING_MODEL)
        .await?;

    let loader = CsvLoader::new(&args.input_csv_filepath, &args.page_content_column_name);
    let count = write_documents(&store, &loader).await?;

    println!("{}", documents_written_message(count, &args.table_name));
    Ok(count)
}

pub async fn handle_delete_command(config: Arc<AppConfig>, args: &DeleteArgs) -> Result<()> {
    println!("{}", deleting_table_message(&args.table_name));

    let factory = ConnectionFactory::new(config);
    let store = factory
        .create_vector_store_client(&args.table_name, DEFAULT_EMBEDDING_MODEL)
        .await?;
    let deleted = delete_all_documents(&store).await?;
    info!("Removed {} rows from {}", deleted, args.table_name);

    println!("{}", table_deleted_message(&args.table_name));
    Ok(())
}
