//! Browser bindings
//!
//! The scene and physics engine live on the JS side. This module builds the
//! selected board, hands its bodies over as JSON, and turns `devicemotion`
//! events into the shared gravity slot that JS polls once per frame.

use std::cell::RefCell;

use wasm_bindgen::prelude::*;
use web_sys::DeviceMotionEvent;

use crate::Settings;
use crate::boards;
use crate::sim::{GravityReader, MotionFeed, MotionSample, gravity_channel};

/// Standard gravity; browsers report acceleration in m/s²
const STANDARD_GRAVITY: f64 = 9.81;

thread_local! {
    static GRAVITY: RefCell<Option<GravityReader>> = const { RefCell::new(None) };
}

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).map_err(js_err)?;

    log::info!("Marble Maze starting...");

    let settings = Settings::load();
    let definition = boards::by_id(&settings.board).unwrap_or_else(|e| {
        log::warn!("{e}, falling back to {}", boards::DEFAULT_BOARD);
        boards::classic()
    });

    let (writer, reader) = gravity_channel();
    GRAVITY.with(|slot| *slot.borrow_mut() = Some(reader));

    let mut feed = MotionFeed::new(
        writer,
        settings.gravity_mapping(&definition),
        settings.sensor_interval_ms,
    );

    let window = web_sys::window().ok_or("no window")?;
    let closure = Closure::<dyn FnMut(_)>::new(move |event: DeviceMotionEvent| {
        let Some(acc) = event.acceleration_including_gravity() else {
            return;
        };
        let axis = |v: Option<f64>| (v.unwrap_or(0.0) / STANDARD_GRAVITY) as f32;
        let sample = MotionSample::new(axis(acc.x()), axis(acc.y()), axis(acc.z()));
        feed.on_sample(js_sys::Date::now(), sample);
    });
    window.add_event_listener_with_callback("devicemotion", closure.as_ref().unchecked_ref())?;
    closure.forget();

    log::info!("Marble Maze running with board '{}'", definition.id);
    Ok(())
}

/// Collision bodies for a board as JSON
#[wasm_bindgen]
pub fn board_bodies_json(board_id: &str) -> Result<String, JsValue> {
    let settings = Settings::load();
    let board = boards::by_id(board_id).and_then(|d| d.build()).map_err(js_err)?;
    serde_json::to_string(&board.bodies(settings.panel_thickness)).map_err(js_err)
}

/// Course (start, start line, finish, fall depth) for a board as JSON
#[wasm_bindgen]
pub fn board_course_json(board_id: &str) -> Result<String, JsValue> {
    let definition = boards::by_id(board_id).map_err(js_err)?;
    serde_json::to_string(&definition.course).map_err(js_err)
}

/// Remember the player's board choice; takes effect on next start
#[wasm_bindgen]
pub fn select_board(board_id: &str) -> Result<(), JsValue> {
    let definition = boards::by_id(board_id).map_err(js_err)?;
    let mut settings = Settings::load();
    settings.board = definition.id;
    settings.save();
    Ok(())
}

/// Newest gravity `[x, y, z]` since the last call, if the sensor sent one
#[wasm_bindgen]
pub fn take_gravity() -> Option<Vec<f32>> {
    GRAVITY.with(|slot| {
        slot.borrow()
            .as_ref()
            .and_then(|reader| reader.take_latest())
            .map(|g| g.to_array().to_vec())
    })
}
