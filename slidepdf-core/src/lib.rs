//! Display-agnostic presentation logic: page navigation, display modes,
//! freehand annotations and rehearsal timing. Rendering backends implement
//! [`PageStore`]; output surfaces implement [`Canvas`].

pub mod canvas;
pub mod geom;
pub mod layout;
pub mod presenter;
pub mod profile;
pub mod scribble;
pub mod timing;

pub use canvas::{BitmapView, Canvas, Color, FrameBuffer, PageStore};
pub use geom::{Point, Rect, Size, SizeF};
pub use layout::{Screen, ScreenLayout};
pub use presenter::{Mode, Presenter, PresenterEvent, ThumbGrid};
pub use profile::{PresentationProfile, ProfileError};
pub use scribble::Scribble;
pub use timing::{format_minutes, Clock, SystemClock, TimingLog, TimingReport};
