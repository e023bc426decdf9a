//! Bounding box types for the two layouts this crate deals with: corner
//! boxes read from VOC XML and center/size boxes written to YOLO labels.

use std::marker::PhantomData;

use super::{Normalized, Pixel};

/// An axis-aligned bounding box in XYXY format (xmin, ymin, xmax, ymax).
///
/// Like the annotation files it is read from, this type does not enforce
/// `min <= max`; reversed corners produce negative extents.
#[derive(Clone, Copy, PartialEq)]
pub struct BBoxXYXY<TSpace> {
    xmin: f64,
    ymin: f64,
    xmax: f64,
    ymax: f64,
    _space: PhantomData<TSpace>,
}

impl<TSpace> BBoxXYXY<TSpace> {
    /// Creates a new bounding box from explicit corner coordinates.
    #[inline]
    pub fn from_xyxy(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> Self {
        Self {
            xmin,
            ymin,
            xmax,
            ymax,
            _space: PhantomData,
        }
    }

    #[inline]
    pub fn xmin(&self) -> f64 {
        self.xmin
    }

    #[inline]
    pub fn ymin(&self) -> f64 {
        self.ymin
    }

    #[inline]
    pub fn xmax(&self) -> f64 {
        self.xmax
    }

    #[inline]
    pub fn ymax(&self) -> f64 {
        self.ymax
    }
}

impl<TSpace> std::fmt::Debug for BBoxXYXY<TSpace> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BBoxXYXY")
            .field("xmin", &self.xmin)
            .field("ymin", &self.ymin)
            .field("xmax", &self.xmax)
            .field("ymax", &self.ymax)
            .finish()
    }
}

impl BBoxXYXY<Pixel> {
    /// Converts to a normalized center/size box for YOLO labels.
    ///
    /// The arithmetic mirrors the established VOC-to-YOLO recipe: the corner
    /// values are taken as the tuple (xmin, xmax, ymin, ymax), centers and
    /// extents are computed per axis and then scaled by the reciprocal of the
    /// image size. The order of operations is part of the output format.
    pub fn to_normalized_cxcywh(
        &self,
        image_width: u32,
        image_height: u32,
    ) -> BBoxCXCYWH<Normalized> {
        let box_ = (self.xmin, self.xmax, self.ymin, self.ymax);
        let dw = 1.0 / image_width as f64;
        let dh = 1.0 / image_height as f64;

        let cx = (box_.0 + box_.1) / 2.0;
        let cy = (box_.2 + box_.3) / 2.0;
        let w = box_.1 - box_.0;
        let h = box_.3 - box_.2;

        BBoxCXCYWH::new(cx * dw, cy * dh, w * dw, h * dh)
    }
}

/// An axis-aligned bounding box in center/size format (cx, cy, w, h).
#[derive(Clone, Copy, PartialEq)]
pub struct BBoxCXCYWH<TSpace> {
    pub cx: f64,
    pub cy: f64,
    pub w: f64,
    pub h: f64,
    _space: PhantomData<TSpace>,
}

impl<TSpace> BBoxCXCYWH<TSpace> {
    #[inline]
    pub fn new(cx: f64, cy: f64, w: f64, h: f64) -> Self {
        Self {
            cx,
            cy,
            w,
            h,
            _space: PhantomData,
        }
    }

    /// Returns the four values in label order.
    #[inline]
    pub fn to_tuple(&self) -> (f64, f64, f64, f64) {
        (self.cx, self.cy, self.w, self.h)
    }
}

impl<TSpace> std::fmt::Debug for BBoxCXCYWH<TSpace> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BBoxCXCYWH")
            .field("cx", &self.cx)
            .field("cy", &self.cy)
            .field("w", &self.w)
            .field("h", &self.h)
            .finish()
    }
}
