use kb_board::BoardService;
use kb_board::view::is_visible;
use kb_core::entities::{Request, User};

/// Look a request up by ID or protocol, hiding requests outside the
/// viewer's sector.
pub fn find_visible(
    board: &BoardService,
    viewer: &User,
    id_or_protocol: &str,
) -> anyhow::Result<Option<Request>> {
    let found = match board.get_request(id_or_protocol)? {
        Some(request) => Some(request),
        None => board.get_request_by_protocol(id_or_protocol)?,
    };
    Ok(found.filter(|request| is_visible(viewer, request)))
}
