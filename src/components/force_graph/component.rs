use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::render;
use super::state::CanvasState;
use crate::graph::{Triple, Vec2};

type SharedState = Rc<RefCell<Option<CanvasState>>>;

fn window_size(window: &Window) -> Option<(f64, f64)> {
	let w = window.inner_width().ok()?.as_f64()?;
	let h = window.inner_height().ok()?.as_f64()?;
	Some((w, h))
}

fn local_point(canvas: &HtmlCanvasElement, ev: &MouseEvent) -> Vec2 {
	let rect = canvas.get_bounding_client_rect();
	Vec2::new(
		(ev.client_x() as f64 - rect.left()) as f32,
		(ev.client_y() as f64 - rect.top()) as f32,
	)
}

fn with_state(state: &SharedState, f: impl FnOnce(&mut CanvasState)) {
	if let Some(ref mut s) = *state.borrow_mut() {
		f(s);
	}
}

#[component]
pub fn ForceGraphCanvas(
	#[prop(into)] triples: Signal<Vec<Triple>>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: SharedState = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (state_init, animate_init, resize_cb_init) =
		(state.clone(), animate.clone(), resize_cb.clone());

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};

		let (w, h) = if fullscreen {
			window_size(&window).unwrap_or((800.0, 600.0))
		} else {
			(
				width.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_width() as f64)
						.unwrap_or(800.0)
				}),
				height.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_height() as f64)
						.unwrap_or(600.0)
				}),
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let Some(ctx) = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
		else {
			log::warn!("canvas 2d context unavailable");
			return;
		};

		let triples = triples.get();
		if triples.is_empty() {
			log::warn!("no triples available; nothing to draw");
		}
		let seed = js_sys::Date::now() as u64;
		*state_init.borrow_mut() = Some(CanvasState::new(&triples, w, h, seed));

		if fullscreen {
			let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let Some((nw, nh)) = web_sys::window().as_ref().and_then(window_size) else {
					return;
				};
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				with_state(&state_resize, |s| s.resize(nw, nh));
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let (state_anim, animate_inner) = (state_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			with_state(&state_anim, |s| {
				s.tick();
				render::render(s, &ctx);
			});
			if let (Some(win), Some(cb)) = (web_sys::window(), animate_inner.borrow().as_ref()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let p = local_point(&canvas, &ev);
		with_state(&state_md, |s| {
			s.engine.pointer_down(p);
		});
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let p = local_point(&canvas, &ev);
		with_state(&state_mm, |s| s.engine.pointer_move(p));
	};

	let state_mu = state.clone();
	let on_mouseup = move |_: MouseEvent| {
		with_state(&state_mu, |s| s.engine.pointer_up());
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		with_state(&state_ml, |s| s.engine.pointer_leave());
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		// One notch is roughly 100 pixels of delta in most browsers.
		let (dx, dy) = (-ev.delta_x() / 100.0, -ev.delta_y() / 100.0);
		with_state(&state_wh, |s| s.engine.wheel(dx as f32, dy as f32));
	};

	let state_reset = state.clone();
	let on_reset = move |_: MouseEvent| {
		with_state(&state_reset, |s| s.engine.reset_layout());
	};

	let state_clear = state.clone();
	let on_clear = move |_: MouseEvent| {
		with_state(&state_clear, |s| s.engine.clear_selection());
	};

	view! {
		<div class="force-graph">
			<div class="force-graph-toolbar">
				<button on:click=on_reset>"Reset Layout"</button>
				<button on:click=on_clear>"Clear Selection"</button>
			</div>
			<canvas
				node_ref=canvas_ref
				class="force-graph-canvas"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				on:wheel=on_wheel
				style="display: block; cursor: grab;"
			/>
		</div>
	}
}
