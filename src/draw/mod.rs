//! Draw operations and everything they are built from: brushes, shapes,
//! coordinate sources, the undo journal, clipboards and event hooks.

pub mod brush;
pub mod copy_state;
pub mod enumeration;
pub mod events;
pub mod operation;
pub mod scheduler;
pub mod shapes;
pub mod summary;
pub mod undo;

pub use brush::{Brush, BrushContext, BrushFactory, BrushManager};
pub use copy_state::{Axis, CopyState};
pub use enumeration::{CoordSource, DrawPlan, Fill};
pub use events::{BlockPlacedEvent, DrawEvents, DrawObserver};
pub use operation::{DrawOpHandle, DrawOperation};
pub use scheduler::DrawScheduler;
pub use shapes::{Cuboid, Cut, DrawShape, Ellipsoid, Line, Paste, Undo};
pub use summary::DrawSummary;
pub use undo::{UndoBlock, UndoState};
