// ABOUTME: Welcomer core library: the image pipeline behind animated welcome cards
// ABOUTME: Fetches avatars, masks them into bordered circles, composites frames, encodes GIFs

pub mod avatar;
pub mod constants;
pub mod encode;
pub mod error;
pub mod frames;
pub mod mask;
pub mod pipeline;
pub mod text;

pub use avatar::AvatarFetcher;
pub use error::WelcomerError;
pub use frames::FrameCompositor;
pub use pipeline::{RenderOptions, WelcomeArtifact, WelcomeContext, WelcomeRenderer};
