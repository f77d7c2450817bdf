//! Frame annotation
//!
//! Draws detection rectangles and the alert overlay onto the RGB frame
//! before it is handed to the display sink: faces green, eyes blue, and a
//! red border while the frame concluded "drowsy".

use camera_capture::VideoFrame;
use drowsiness::FrameAnalysis;
use image::Rgb;
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;

const FACE_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
const EYE_COLOR: Rgb<u8> = Rgb([0, 0, 255]);
const ALERT_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
const ALERT_BORDER_PX: u32 = 4;

/// Annotate a frame in place with the analysis results.
pub fn annotate(frame: &mut VideoFrame, analysis: &FrameAnalysis) {
    for face in &analysis.faces {
        draw_hollow_rect_mut(
            &mut frame.rgb,
            Rect::at(face.x as i32, face.y as i32).of_size(face.width.max(1), face.height.max(1)),
            FACE_COLOR,
        );
    }

    for eye in &analysis.eyes {
        draw_hollow_rect_mut(
            &mut frame.rgb,
            Rect::at(eye.x as i32, eye.y as i32).of_size(eye.width.max(1), eye.height.max(1)),
            EYE_COLOR,
        );
    }

    if analysis.currently_drowsy {
        let (width, height) = frame.rgb.dimensions();
        for inset in 0..ALERT_BORDER_PX.min(width / 2).min(height / 2) {
            draw_hollow_rect_mut(
                &mut frame.rgb,
                Rect::at(inset as i32, inset as i32)
                    .of_size(width - 2 * inset, height - 2 * inset),
                ALERT_COLOR,
            );
        }
    }
}
