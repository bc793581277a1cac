//! Available-boards reconciliation
//!
//! Pure functions: given the latest snapshots they always produce the same
//! sorted list, so a late or repeated recomputation is harmless.

use std::collections::HashMap;

use crate::models::{
    AttachedBoard, AvailableBoard, AvailableBoardState, Board, BoardsConfig, Port,
};
use crate::platform::HostPlatform;

/// Snapshot inputs for one reconciliation
#[derive(Debug, Clone, Copy)]
pub struct ReconcileInput<'a> {
    pub attached_boards: &'a [AttachedBoard],
    pub available_ports: &'a [Port],
    pub boards_config: &'a BoardsConfig,
    /// Last board selected on a port, keyed by the port's display string
    pub guesses: &'a HashMap<String, Board>,
    pub platform: HostPlatform,
}

/// Ports that may carry a board on this platform
pub fn board_ports(ports: &[Port], platform: HostPlatform) -> Vec<&Port> {
    ports
        .iter()
        .filter(|port| port.is_board_port(platform))
        .collect()
}

/// Board ports that no attached board claims; these are the ones needing a
/// stored guess
pub fn unclaimed_board_ports<'a>(
    attached_boards: &[AttachedBoard],
    ports: &'a [Port],
    platform: HostPlatform,
) -> Vec<&'a Port> {
    board_ports(ports, platform)
        .into_iter()
        .filter(|port| find_attached(attached_boards, port).is_none())
        .collect()
}

fn find_attached<'a>(attached_boards: &'a [AttachedBoard], port: &Port) -> Option<&'a AttachedBoard> {
    attached_boards
        .iter()
        .filter(|board| board.port().is_some())
        .find(|board| Port::same_as(Some(port), board.port()))
}

/// Derive the sorted list of available boards
pub fn reconcile(input: ReconcileInput<'_>) -> Vec<AvailableBoard> {
    let mut available: Vec<AvailableBoard> = board_ports(input.available_ports, input.platform)
        .into_iter()
        .map(|port| {
            let (board, state) = match find_attached(input.attached_boards, port) {
                Some(attached) => (Some(attached.board().clone()), AvailableBoardState::Recognized),
                None => match input.guesses.get(&port.to_display_string(false)) {
                    Some(guess) => (Some(guess.clone()), AvailableBoardState::Guessed),
                    None => (None, AvailableBoardState::Incomplete),
                },
            };
            match board {
                Some(board) => {
                    let selected = input.boards_config.same_as(&board, port);
                    AvailableBoard::new(board, port.clone(), state, selected)
                }
                None => AvailableBoard::unknown(port.clone()),
            }
        })
        .collect();

    available.sort_by(|left, right| left.compare(right, input.platform));
    available
}

/// `true` if `next` differs from `previous` in length or in any element
pub fn has_changed(
    previous: &[AvailableBoard],
    next: &[AvailableBoard],
    platform: HostPlatform,
) -> bool {
    previous.len() != next.len()
        || previous
            .iter()
            .zip(next)
            .any(|(left, right)| left.compare(right, platform) != std::cmp::Ordering::Equal)
}
