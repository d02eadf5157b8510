//! Subcommand implementations.

use std::sync::Arc;

use anyhow::{Context as _, bail};
use clap::Subcommand;
use nook_catalog::{CategoryAggregator, GoogleBooksClient, PageLoad, Paginator};
use nook_core::{library::Library, store::LibraryStore};
use tracing::info;

use crate::{render, settings::Settings};

#[derive(Subcommand, Debug)]
pub enum Command {
  /// Fetch the home-screen categories, printing each as it arrives.
  Browse {
    /// Category label to fetch instead of the configured list. Repeatable.
    #[arg(short, long = "category", value_name = "LABEL")]
    categories: Vec<String>,
  },
  /// Page through one category.
  More {
    subject: String,
    /// Number of pages to load.
    #[arg(short, long, default_value_t = 1)]
    pages:   u32,
  },
  /// Fetch a volume from the catalog and add it to the library.
  Save { volume_id: String },
  /// Remove an item from the library.
  Remove { id: String },
  /// Record how many pages of an item have been read.
  Progress { id: String, pages: u32 },
  /// Show one library item in full.
  Show { id: String },
  /// List the library.
  List {
    /// Print the items as JSON.
    #[arg(long)]
    json: bool,
  },
  /// Show the reading streak.
  Stats,
  /// Print library changes as they happen, until interrupted.
  Watch,
}

fn catalog(settings: &Settings) -> anyhow::Result<Arc<GoogleBooksClient>> {
  let client =
    GoogleBooksClient::new(settings.client_config()).context("failed to build catalog client")?;
  Ok(Arc::new(client))
}

pub async fn run<S>(command: Command, settings: &Settings, library: &Library<S>) -> anyhow::Result<()>
where
  S: LibraryStore,
{
  match command {
    Command::Browse { categories } => {
      let labels = if categories.is_empty() { settings.categories.clone() } else { categories };
      let aggregator = CategoryAggregator::new(catalog(settings)?);
      aggregator.fetch_all(&labels, &mut render::ShelfPrinter::default()).await;
    }

    Command::More { subject, pages } => {
      let pager = Paginator::new(catalog(settings)?, subject);
      for _ in 0..pages {
        match pager.load_more().await {
          PageLoad::Appended(items) if items.is_empty() => break,
          PageLoad::Appended(items) => {
            for item in &items {
              println!("{}", render::catalog_line(item));
            }
          }
          PageLoad::Skipped => {}
        }
      }
      info!(
        subject = pager.subject(),
        loaded = pager.items().len(),
        next_offset = pager.offset(),
        "paging finished"
      );
    }

    Command::Save { volume_id } => {
      let item = catalog(settings)?
        .volume(&volume_id)
        .await
        .with_context(|| format!("failed to fetch volume {volume_id}"))?;
      let id = item.external_id.clone();
      let title = item.title.clone();
      library.save(item).await;
      if !library.exists(&id).await {
        bail!("{id} could not be saved");
      }
      println!("saved {id}: {title}");
    }

    Command::Remove { id } => {
      if !library.exists(&id).await {
        println!("{id} is not in the library");
        return Ok(());
      }
      library.delete(&id).await;
      println!("removed {id}");
    }

    Command::Progress { id, pages } => {
      if !library.exists(&id).await {
        bail!("{id} is not in the library");
      }
      library.update_progress(&id, pages).await;
      if let Some(item) = library.get(&id).await {
        println!("{}", render::saved_line(&item));
      }
      println!("{}", render::stats(&library.current_stats().await));
    }

    Command::Show { id } => match library.get(&id).await {
      Some(item) => print!("{}", render::saved_details(&item)),
      None => bail!("{id} is not in the library"),
    },

    Command::List { json } => {
      let items = library.list_all().await;
      if json {
        println!("{}", serde_json::to_string_pretty(&items)?);
      } else if items.is_empty() {
        println!("the library is empty");
      } else {
        for item in &items {
          println!("{}", render::saved_line(item));
        }
      }
    }

    Command::Stats => println!("{}", render::stats(&library.current_stats().await)),

    Command::Watch => {
      let mut subscription = library
        .subscribe()
        .await
        .context("failed to subscribe to library changes")?;
      loop {
        tokio::select! {
          event = subscription.next() => match event {
            Some(event) => println!("{}", render::event(&event)),
            None => break,
          },
          _ = tokio::signal::ctrl_c() => break,
        }
      }
      subscription.unsubscribe();
    }
  }

  Ok(())
}
