#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

#[doc(inline)]
pub use rota_image as image;

#[doc(inline)]
pub use rota_imgproc as imgproc;

#[doc(inline)]
pub use rota_io as io;
