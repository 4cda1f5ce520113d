//! Contract bindings and client-side types.

mod abi;
pub use abi::{Claim, IDDO, IPayments, PieceInfo, RailInfo, RailView, TokenConfig};

mod ddo;
pub use ddo::{AllocationRail, SpBasicInfo, SpConfig, SpRegistration};

mod erc20;
pub use erc20::IERC20;

mod payments;
pub use payments::{Account, AccumulatedFees, OperatorApproval, SettledAccountInfo};

mod piece;
pub use piece::{PieceRequest, load_pieces_file, parse_piece_cid, pieces_from_json};
