//! Read side of the board, filtered by the viewer's visibility.

use chrono::Utc;
use kb_core::actor::Actor;
use kb_core::entities::{Request, User};
use kb_store::Collection;

use crate::error::BoardError;
use crate::service::BoardService;
use crate::view::{self, Board, BoardStats, Catalog, RequestView};

impl BoardService {
    fn catalog(&self) -> Result<Catalog, BoardError> {
        let actor = Actor::system();
        Ok(Catalog::new(
            self.load(Collection::Categories, "read categories", &actor)?,
            self.load(Collection::Sectors, "read sectors", &actor)?,
        ))
    }

    /// Requests `viewer` may see, newest first.
    ///
    /// # Errors
    ///
    /// Returns `BoardError::Store` if the collection cannot be read.
    pub fn list_requests(&self, viewer: &User) -> Result<Vec<Request>, BoardError> {
        let mut requests: Vec<Request> = self
            .load::<Request>(Collection::Requests, "list requests", &Actor::from(viewer))?
            .into_iter()
            .filter(|r| view::is_visible(viewer, r))
            .collect();
        requests.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(requests)
    }

    /// Visible requests matching `term`, resolved for display.
    ///
    /// # Errors
    ///
    /// Returns `BoardError::Store` if a collection cannot be read.
    pub fn search_requests(&self, viewer: &User, term: &str) -> Result<Vec<RequestView>, BoardError> {
        let catalog = self.catalog()?;
        let now = Utc::now();
        Ok(self
            .list_requests(viewer)?
            .into_iter()
            .filter(|r| catalog.matches(r, term))
            .map(|r| catalog.resolve(r, now))
            .collect())
    }

    /// Visible requests grouped into the four status columns.
    ///
    /// # Errors
    ///
    /// Returns `BoardError::Store` if a collection cannot be read.
    pub fn board(&self, viewer: &User, term: Option<&str>) -> Result<Board, BoardError> {
        let views = self.search_requests(viewer, term.unwrap_or_default())?;
        Ok(view::group(views))
    }

    /// Counters over the visible requests.
    ///
    /// # Errors
    ///
    /// Returns `BoardError::Store` if the collection cannot be read.
    pub fn stats(&self, viewer: &User) -> Result<BoardStats, BoardError> {
        let requests = self.list_requests(viewer)?;
        Ok(view::count(&requests, Utc::now()))
    }

    /// Resolve category and sector names for one request.
    ///
    /// # Errors
    ///
    /// Returns `BoardError::Store` if a collection cannot be read.
    pub fn request_view(&self, request: Request) -> Result<RequestView, BoardError> {
        Ok(self.catalog()?.resolve(request, Utc::now()))
    }
}
