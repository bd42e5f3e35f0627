//! Pixel arithmetic with a constant
//!
//! Every sample of every plane is combined with a real-valued constant,
//! clamped to `[0, 255]` and truncated toward zero.

use super::PixelBuffer;
use crate::error::{Error, Result};

/// Operator applied by [`PixelBuffer::apply_constant`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl ArithOp {
    #[inline]
    fn eval(self, value: f64, constant: f64) -> f64 {
        match self {
            ArithOp::Add => value + constant,
            ArithOp::Subtract => value - constant,
            ArithOp::Multiply => value * constant,
            ArithOp::Divide => value / constant,
        }
    }
}

impl PixelBuffer {
    /// Combine every sample with `constant` and return a new buffer.
    ///
    /// # Arguments
    ///
    /// * `op` - Operator to apply
    /// * `constant` - Right-hand operand
    ///
    /// # Errors
    ///
    /// Returns [`Error::DivisionByZero`] when `op` is [`ArithOp::Divide`]
    /// and `constant` is zero.
    ///
    /// # Example
    ///
    /// ```
    /// use glyphscan_core::{ArithOp, PixelBuffer};
    ///
    /// let buf = PixelBuffer::from_gray(2, 1, vec![10, 250]).unwrap();
    /// let out = buf.apply_constant(ArithOp::Add, 10.0).unwrap();
    /// assert_eq!(out.data(), &[20, 255]);
    /// ```
    pub fn apply_constant(&self, op: ArithOp, constant: f64) -> Result<PixelBuffer> {
        let mut out = self.clone();
        out.apply_constant_inplace(op, constant)?;
        Ok(out)
    }

    /// In-place variant of [`PixelBuffer::apply_constant`].
    pub fn apply_constant_inplace(&mut self, op: ArithOp, constant: f64) -> Result<()> {
        if op == ArithOp::Divide && constant == 0.0 {
            return Err(Error::DivisionByZero);
        }
        for v in &mut self.data {
            *v = op.eval(*v as f64, constant).clamp(0.0, 255.0) as u8;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buf() -> PixelBuffer {
        PixelBuffer::from_gray(4, 1, vec![0, 10, 100, 250]).unwrap()
    }

    #[test]
    fn test_subtract_clamps_at_zero() {
        let out = buf().apply_constant(ArithOp::Subtract, 20.0).unwrap();
        assert_eq!(out.data(), &[0, 0, 80, 230]);
    }

    #[test]
    fn test_multiply_truncates_and_clamps() {
        let out = buf().apply_constant(ArithOp::Multiply, 4.2).unwrap();
        // 10 * 4.2 = 42.0, 100 * 4.2 = 420 -> 255
        assert_eq!(out.data(), &[0, 42, 255, 255]);
    }

    #[test]
    fn test_divide() {
        let out = buf().apply_constant(ArithOp::Divide, 3.0).unwrap();
        assert_eq!(out.data(), &[0, 3, 33, 83]);
    }

    #[test]
    fn test_divide_by_zero_is_rejected() {
        assert!(matches!(
            buf().apply_constant(ArithOp::Divide, 0.0),
            Err(Error::DivisionByZero)
        ));
    }

    #[test]
    fn test_rgb_applies_to_every_plane() {
        let rgb = PixelBuffer::from_rgb_planes(1, 1, &[1], &[2], &[3]).unwrap();
        let out = rgb.apply_constant(ArithOp::Add, 1.0).unwrap();
        assert_eq!(out.data(), &[2, 3, 4]);
    }
}
