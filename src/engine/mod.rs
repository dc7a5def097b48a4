//! engine
//!
//! Drives the configured forges for one invocation.
//!
//! # Lifecycle
//!
//! ```text
//! INIT -> LISTING -> DONE
//!                 \-> FAILED
//! ```
//!
//! Listing writes the prompt header, lists each forge in configuration
//! order, and writes the trailing `refresh` row in both terminal states so
//! the menu always offers a way to retry. The first failing forge stops
//! the listing; forges after it are not contacted.
//!
//! # Example
//!
//! ```ignore
//! use gitforge::engine::Dispatcher;
//!
//! let dispatcher = Dispatcher::new(create_forges(&config, &paths)?, config.menu_prompt());
//! let mut out = std::io::BufWriter::new(std::io::stdout());
//! dispatcher.list(&mut out).await?;
//! ```

use std::io::{self, Write};

use thiserror::Error;

use crate::forge::{Forge, ForgeError};
use crate::ui::menu;

/// Errors from dispatching to forges.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// A forge operation failed. Displays as the forge name so the error
    /// chain reads `<forge>: <message>`.
    #[error("{forge}")]
    Forge {
        /// Name of the failing forge
        forge: String,
        #[source]
        source: ForgeError,
    },

    /// Writing the prompt or trailer row failed.
    #[error("failed to write menu output")]
    Output(#[source] io::Error),
}

impl DispatchError {
    /// Name of the failing forge, if a forge failed.
    pub fn forge(&self) -> Option<&str> {
        match self {
            DispatchError::Forge { forge, .. } => Some(forge),
            DispatchError::Output(_) => None,
        }
    }
}

/// The ordered forge set of one invocation.
pub struct Dispatcher {
    forges: Vec<Box<dyn Forge>>,
    prompt: String,
}

impl Dispatcher {
    /// Create a dispatcher over `forges`, in display order.
    pub fn new(forges: Vec<Box<dyn Forge>>, prompt: impl Into<String>) -> Self {
        Self {
            forges,
            prompt: prompt.into(),
        }
    }

    /// Names of the forges, in order.
    pub fn forge_names(&self) -> Vec<&str> {
        self.forges.iter().map(|f| f.name()).collect()
    }

    /// Write the full menu to `out`.
    ///
    /// The `refresh` row is written even when a forge fails; the forge
    /// error is returned afterwards.
    pub async fn list(&self, out: &mut (dyn Write + Send)) -> Result<(), DispatchError> {
        menu::write_prompt(out, &self.prompt).map_err(DispatchError::Output)?;

        let mut failure = None;
        for forge in &self.forges {
            if let Err(source) = forge.list(out).await {
                failure = Some(DispatchError::Forge {
                    forge: forge.name().to_string(),
                    source,
                });
                break;
            }
        }

        let trailer = menu::write_refresh(out).map_err(DispatchError::Output);

        match failure {
            Some(err) => Err(err),
            None => trailer,
        }
    }

    /// Refresh every forge's cache, in order, stopping at the first failure.
    pub async fn refresh(&self) -> Result<(), DispatchError> {
        for forge in &self.forges {
            forge
                .refresh()
                .await
                .map_err(|source| DispatchError::Forge {
                    forge: forge.name().to_string(),
                    source,
                })?;
        }
        Ok(())
    }
}
