//! Interactive terminal front end for the catalog controller.
//!
//! Reads one command per line and re-renders the products page whenever the
//! controller's view changes. Typing goes through the same debounced search
//! path as a search box would:
//!
//! ```text
//! > type bas           (debounced: nothing sent yet)
//! > type basket        (supersedes "bas"; searched after the quiet period)
//! > add upLK9JbQ4rMhTwt4
//! > qty upLK9JbQ4rMhTwt4 3
//! ```

use std::str::FromStr;
use std::sync::Arc;

use qkart_core::{Notification, ProductId};
use qkart_core::nav::{HeaderState, Page};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::catalog::{AddToCartOptions, CatalogController};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::notify::{Notifier, ToastQueue};
use crate::session::{Session, SessionStore};
use crate::view::{CatalogTemplate, header_line, toast_line};

const HELP: &str = "\
Commands:
  type <text>          type into the search box (debounced)
  search <text>        search immediately
  add <id> [qty]       add a product to the cart
  qty <id> <n>         set the quantity of a cart line (0 removes it)
  show                 re-render the page
  reload               reload catalog and cart
  login <token> <name> store a session issued by the login page
  logout               clear the stored session
  checkout             go to checkout
  help                 this text
  quit                 exit
";

/// A parsed shell command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Type(String),
    Search(String),
    Add { product_id: ProductId, qty: u32 },
    Quantity { product_id: ProductId, qty: u32 },
    Show,
    Reload,
    Login { token: String, username: String },
    Logout,
    Checkout,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = AppError;

    fn from_str(line: &str) -> Result<Self> {
        let line = line.trim();
        let (verb, rest) = line.split_once(' ').unwrap_or((line, ""));
        let rest = rest.trim();
        let args: Vec<&str> = rest.split_whitespace().collect();

        let bad = || AppError::BadCommand(line.to_string());
        let parse_qty = |raw: &str| raw.parse::<u32>().map_err(|_| bad());

        match (verb, args.as_slice()) {
            ("type", _) => Ok(Self::Type(rest.to_string())),
            ("search", _) => Ok(Self::Search(rest.to_string())),
            ("add", [id]) => Ok(Self::Add {
                product_id: ProductId::new(*id),
                qty: 1,
            }),
            ("add", [id, qty]) => Ok(Self::Add {
                product_id: ProductId::new(*id),
                qty: parse_qty(*qty)?,
            }),
            ("qty", [id, qty]) => Ok(Self::Quantity {
                product_id: ProductId::new(*id),
                qty: parse_qty(*qty)?,
            }),
            ("show", []) => Ok(Self::Show),
            ("reload", []) => Ok(Self::Reload),
            ("login", [token, username]) => Ok(Self::Login {
                token: (*token).to_string(),
                username: (*username).to_string(),
            }),
            ("logout", []) => Ok(Self::Logout),
            ("checkout", []) => Ok(Self::Checkout),
            ("help" | "?", []) => Ok(Self::Help),
            ("quit" | "exit", []) => Ok(Self::Quit),
            _ => Err(bad()),
        }
    }
}

/// The interactive storefront.
pub struct Shell {
    controller: CatalogController,
    store: SessionStore,
    toasts: Arc<ToastQueue>,
}

impl Shell {
    #[must_use]
    pub const fn new(
        controller: CatalogController,
        store: SessionStore,
        toasts: Arc<ToastQueue>,
    ) -> Self {
        Self {
            controller,
            store,
            toasts,
        }
    }

    /// Run until `quit` or end of input.
    ///
    /// # Errors
    ///
    /// Returns an error if reading input or writing output fails.
    pub async fn run<R, W>(&self, input: R, mut output: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let session_watcher = self.controller.watch_session();
        let result = self.event_loop(input, &mut output).await;
        session_watcher.abort();

        self.flush_toasts(&mut output).await?;
        result
    }

    async fn event_loop<R, W>(&self, input: R, output: &mut W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut revisions = self.controller.subscribe();
        let mut lines = input.lines();

        self.controller.initialize().await;
        revisions.mark_unchanged();
        self.render(output).await?;
        self.flush_toasts(output).await?;

        loop {
            tokio::select! {
                biased;

                changed = revisions.changed() => {
                    if changed.is_err() {
                        return Ok(());
                    }
                    revisions.mark_unchanged();
                    self.render(output).await?;
                    self.flush_toasts(output).await?;
                }
                line = lines.next_line() => {
                    let Some(line) = line? else {
                        return Ok(());
                    };
                    if line.trim().is_empty() {
                        continue;
                    }
                    match self.dispatch(&line, output).await {
                        Ok(true) => {}
                        Ok(false) => return Ok(()),
                        Err(e) if e.is_fatal() => return Err(e),
                        Err(e) => {
                            e.report();
                            write_line(output, &e.to_string()).await?;
                        }
                    }
                    self.flush_toasts(output).await?;
                }
            }
        }
    }

    /// Execute one command line. Returns `false` when the shell should exit.
    async fn dispatch<W: AsyncWrite + Unpin>(&self, line: &str, output: &mut W) -> Result<bool> {
        let command: Command = line.parse()?;
        add_breadcrumb("command", line);

        match command {
            Command::Type(text) => {
                // Completion re-renders through the revision feed
                let _pending = self.controller.search_input(text);
            }
            Command::Search(text) => {
                self.controller.search(&text).await;
            }
            Command::Add { product_id, qty } => {
                self.controller
                    .add_to_cart(
                        &product_id,
                        qty,
                        AddToCartOptions {
                            prevent_duplicate: true,
                        },
                    )
                    .await;
            }
            Command::Quantity { product_id, qty } => {
                self.controller.set_quantity(&product_id, qty).await;
            }
            Command::Show => self.render(output).await?,
            Command::Reload => self.controller.initialize().await,
            Command::Login { token, username } => {
                self.store
                    .sign_in(Session::signed_in(token, username))
                    .await?;
                self.toasts
                    .notify(Notification::success("Logged in successfully"));
            }
            Command::Logout => {
                self.store.logout().await?;
                write_line(output, &format!("-> {}", Page::Products)).await?;
            }
            Command::Checkout => {
                if self.controller.session().is_authenticated() {
                    write_line(output, &format!("-> {}", Page::Checkout)).await?;
                } else {
                    write_line(output, &format!("-> {}", Page::Login)).await?;
                    write_line(output, &auth_page_header()).await?;
                }
            }
            Command::Help => write_line(output, HELP).await?,
            Command::Quit => return Ok(false),
        }

        Ok(true)
    }

    async fn render<W: AsyncWrite + Unpin>(&self, output: &mut W) -> Result<()> {
        let state = self.controller.snapshot().await;
        let page = CatalogTemplate::new(&state, &self.controller.session());
        write_line(output, &askama::Template::render(&page)?).await
    }

    async fn flush_toasts<W: AsyncWrite + Unpin>(&self, output: &mut W) -> Result<()> {
        for toast in self.toasts.drain() {
            write_line(output, &toast_line(&toast)).await?;
        }
        Ok(())
    }
}

/// Header shown on the login and register pages.
#[must_use]
pub fn auth_page_header() -> String {
    header_line(&HeaderState::BackToExplore)
}

async fn write_line<W: AsyncWrite + Unpin>(output: &mut W, text: &str) -> Result<()> {
    output.write_all(text.as_bytes()).await?;
    output.write_all(b"\n").await?;
    output.flush().await?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_type_keeps_spaces() {
        assert_eq!(
            "type  running shoes ".parse::<Command>().unwrap(),
            Command::Type("running shoes".to_string())
        );
        assert_eq!(
            "type".parse::<Command>().unwrap(),
            Command::Type(String::new())
        );
    }

    #[test]
    fn test_parse_add_defaults_to_one() {
        assert_eq!(
            "add A".parse::<Command>().unwrap(),
            Command::Add {
                product_id: ProductId::new("A"),
                qty: 1
            }
        );
        assert_eq!(
            "add A 4".parse::<Command>().unwrap(),
            Command::Add {
                product_id: ProductId::new("A"),
                qty: 4
            }
        );
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(
            "qty B 0".parse::<Command>().unwrap(),
            Command::Quantity {
                product_id: ProductId::new("B"),
                qty: 0
            }
        );
        assert!("qty B many".parse::<Command>().is_err());
        assert!("qty B".parse::<Command>().is_err());
    }

    #[test]
    fn test_parse_login() {
        assert_eq!(
            "login tok crio".parse::<Command>().unwrap(),
            Command::Login {
                token: "tok".to_string(),
                username: "crio".to_string()
            }
        );
    }

    #[test]
    fn test_parse_unknown() {
        let err = "frobnicate".parse::<Command>().unwrap_err();
        assert!(matches!(err, AppError::BadCommand(_)));
    }

    #[test]
    fn test_auth_page_header() {
        assert!(auth_page_header().contains("back to explore"));
    }
}
