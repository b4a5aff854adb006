// What you SEE:
// • The picture, centred, with repeating text packed over the whole canvas.
// • Hold Left Mouse: paint the mask; text moves out of the painted area.
// • Hold Right Mouse: erase the mask; text flows back in.
// • F / Enter exports the text as SVG. C clears the mask. M tints the mask. ESC quits.

use clap::Parser;
use cutout::config::Args;
use cutout::draw::{draw_text_5x7, Drawer};
use cutout::font::BitmapFont;
use cutout::loader::FileImageLoader;
use cutout::types::{FrameBuffer, Point, CANVAS_HEIGHT, CANVAS_WIDTH};
use cutout::{CutoutWidget, Error, Export};
use log::{debug, error, info, warn};
use std::fs;
use std::time::{Duration, Instant};

fn main() -> Result<(), Error> {
    env_logger::init();
    let args = Args::parse();

    /* --- Host side: where finished exports go --- */
    let out = args.out.clone();
    let on_finish = Box::new(move |export: &Export| match fs::write(&out, &export.content) {
        Ok(()) => info!("wrote {} ({} byte data url)", out.display(), export.url.len()),
        Err(e) => error!("could not write {}: {e}", out.display()),
    });

    let mut widget = CutoutWidget::new(Box::new(FileImageLoader), Box::new(BitmapFont), on_finish);
    for change in args.changes() {
        widget.apply(change);
    }

    /* --- Window + the buffer we actually present (canvas + HUD) --- */
    let mut drawer = Drawer::new("Cut-out", CANVAS_WIDTH, CANVAS_HEIGHT)?;
    let mut screen = FrameBuffer::new(CANVAS_WIDTH, CANVAS_HEIGHT);

    let mut was_down = false;
    let mut last_pos: Option<Point> = None;

    let mut last_fps_time = Instant::now();
    let mut frames_this_second: u32 = 0;
    let mut hud_fps_text = String::from("FPS: 0.0");

    /* ------------------------------ Main loop ------------------------------ */
    while drawer.is_open() && !drawer.esc_pressed() {
        let now = Instant::now();

        /* 1) Keys */
        if drawer.c_pressed_once() {
            widget.clear_mask();
        }
        if drawer.m_pressed_once() {
            widget.toggle_mask_tint();
        }
        if drawer.finish_pressed_once() {
            if let Err(e) = widget.finish() {
                warn!("nothing to export yet: {e}");
            }
        }

        /* 2) Pointer -> down / move / up */
        let buttons = drawer.buttons();
        let down = buttons.any();
        if let Some((x, y)) = drawer.mouse_pos() {
            let p = Point::new(x, y);
            if down && !was_down {
                widget.pointer_down(p);
            } else if last_pos != Some(p) {
                widget.pointer_move(p, buttons);
            }
            last_pos = Some(p);
        }
        if was_down && !down {
            widget.pointer_up();
        }
        was_down = down;

        /* 3) The animation frame: finish a load, run at most one layout.
           A failed pass is logged and skipped; the last good preview stays up. */
        if let Err(e) = widget.tick() {
            error!("{e}");
        }

        /* 4) Canvas + HUD */
        screen.pixels.copy_from_slice(&widget.frame().pixels);
        let status = if widget.is_loaded() { "READY" } else { "LOADING" };
        let hud = format!("{status} | LMB PAINT  RMB ERASE  F FINISH | {hud_fps_text}");
        draw_text_5x7(&mut screen, 8, 8, &hud, 0x00_80_80_80);

        drawer.present(&screen)?;

        /* 5) FPS once per second */
        frames_this_second += 1;
        if now.duration_since(last_fps_time) >= Duration::from_secs(1) {
            let secs = now.duration_since(last_fps_time).as_secs_f32();
            let fps = frames_this_second as f32 / secs;
            debug!("FPS: {:.1}", fps);
            hud_fps_text = format!("FPS: {:.1}", fps);
            frames_this_second = 0;
            last_fps_time = now;
        }
    }

    Ok(())
}
