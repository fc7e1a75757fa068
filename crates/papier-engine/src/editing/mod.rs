/*!
 * # Editing Core Module
 *
 * Selection-aware formatting for the markdown editor toolbar.
 *
 * ## Model
 *
 * - An **`EditBuffer`** holds the full document text plus the current
 *   selection as UTF-8 byte offsets. Construction checks
 *   `start <= end <= len` and that both ends fall on char boundaries.
 * - A **`Transformation`** is one toolbar action: bold, italic, heading level,
 *   list toggle, link or code.
 * - Applying a transformation returns **`Transformed`**: the new full text and
 *   the caret position the UI should restore.
 *
 * The core never touches the UI's editable surface. The caller reads the
 * selection out of its widget, builds a buffer, applies the transformation and
 * writes the text and caret back.
 *
 * ## Usage Pattern
 *
 * ```rust
 * use papier_engine::editing::{EditBuffer, Transformation};
 *
 * let buffer = EditBuffer::new("make this loud", 5..9).unwrap();
 * let result = buffer.apply(Transformation::Bold);
 *
 * assert_eq!(result.text, "make **this** loud");
 * assert_eq!(result.caret, 13);
 * ```
 *
 * ## Module Structure
 *
 * - **`buffer`**: `EditBuffer` and its `InvariantViolation` errors
 * - **`transform`**: `Transformation`, `Transformed` and the per-variant rules
 * - **`lines`**: line location by scanning for neighbouring newlines
 */

pub mod buffer;
pub mod lines;
pub mod transform;

pub use buffer::{EditBuffer, InvariantViolation};
pub use lines::{Span, line_span_at};
pub use transform::{HeadingLevel, Transformation, Transformed, transform, transform_action};
