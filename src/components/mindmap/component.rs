//! Leptos components wrapping the mindmap canvas and its side panels.
//!
//! The canvas is redrawn every animation frame from [`MindmapState`]. DOM
//! overlays (tooltip, sidebar, notices) are reactive on a revision counter
//! that each handler bumps after mutating the session.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{
	Blob, BlobPropertyBag, CanvasRenderingContext2d, FileReader, HtmlAnchorElement,
	HtmlCanvasElement, HtmlInputElement, MouseEvent, Url, WheelEvent,
};

use super::interaction::WheelInput;
use super::render;
use super::state::{MindmapState, SelectedDetails};
use super::theme::Theme;
use super::types::{NodeFields, OffsetMap, Tree};

/// Title given to children created from the sidebar.
const NEW_NODE_TITLE: &str = "New node";

/// Shared handles passed down to child components.
#[derive(Clone, Copy)]
struct Session {
	state: StoredValue<MindmapState>,
	revision: RwSignal<u64>,
}

impl Session {
	/// Run `f` against the session and notify reactive overlays.
	fn apply<T>(self, f: impl FnOnce(&mut MindmapState) -> T) -> Option<T> {
		let mut out = None;
		self.state.update_value(|s| out = Some(f(s)));
		self.revision.update(|r| *r += 1);
		out
	}

	/// Read the session, tracking the revision counter.
	fn read<T>(self, f: impl FnOnce(&MindmapState) -> T) -> T {
		self.revision.track();
		self.state.with_value(f)
	}
}

/// Pointer position relative to the canvas' top-left corner.
fn canvas_coords(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?;
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

/// Size of the element hosting the canvas.
fn host_size(canvas: &HtmlCanvasElement) -> (f64, f64) {
	canvas
		.parent_element()
		.map(|p| (p.client_width() as f64, p.client_height() as f64))
		.filter(|&(w, h)| w > 0.0 && h > 0.0)
		.unwrap_or((800.0, 600.0))
}

/// Trigger a browser download of `json` as `file_name`.
fn download_json(file_name: &str, json: &str) -> Result<(), JsValue> {
	let parts = js_sys::Array::of1(&JsValue::from_str(json));
	let options = BlobPropertyBag::new();
	options.set_type("application/json");
	let blob = Blob::new_with_str_sequence_and_options(&parts, &options)?;
	let url = Url::create_object_url_with_blob(&blob)?;

	let document = web_sys::window()
		.and_then(|w| w.document())
		.ok_or_else(|| JsValue::from_str("no document"))?;
	let anchor: HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
	anchor.set_href(&url);
	anchor.set_download(file_name);
	anchor.click();
	Url::revoke_object_url(&url)
}

/// Interactive mindmap editor: toolbar, canvas, hover tooltip and sidebar.
#[component]
pub fn MindmapEditor(
	/// Document shown when the editor mounts.
	tree: Tree,
	/// Manual offsets saved alongside `tree`.
	#[prop(optional)]
	offsets: OffsetMap,
) -> impl IntoView {
	let session = Session {
		state: StoredValue::new(MindmapState::new(tree, offsets, 800.0, 600.0)),
		revision: RwSignal::new(0),
	};
	let draft = RwSignal::new(NodeFields::default());

	view! {
		<div class="mindmap-editor">
			<Toolbar session=session />
			<div class="mindmap-body">
				<MindmapCanvas session=session />
				{move || {
					session
						.read(|s| s.selected_details().map(|d| (d, s.editing().is_some())))
						.map(|(details, editing)| {
							view! { <Sidebar session=session details=details editing=editing draft=draft /> }
						})
				}}
			</div>
			{move || {
				session
					.read(|s| s.notice().map(str::to_string))
					.map(|msg| {
						view! {
							<div class="mindmap-notice" role="alert">
								<span>{msg}</span>
								<button on:click=move |_| {
									session.apply(|s| s.dismiss_notice());
								}>"Dismiss"</button>
							</div>
						}
					})
			}}
		</div>
	}
}

#[component]
fn Toolbar(session: Session) -> impl IntoView {
	let on_export = move |_| {
		let Some(result) = session.apply(|s| s.export_json()) else {
			return;
		};
		if let Ok((name, json)) = result {
			if let Err(e) = download_json(name, &json) {
				warn!("mindmap: download failed: {:?}", e);
				session.apply(|s| s.notify("Export failed: the browser refused the download"));
			}
		}
	};

	let on_import = move |ev: web_sys::Event| {
		let Some(input) = ev
			.target()
			.and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
		else {
			return;
		};
		let Some(file) = input.files().and_then(|files| files.get(0)) else {
			return;
		};
		let Ok(reader) = FileReader::new() else {
			return;
		};
		info!("mindmap: importing '{}'", file.name());

		let reader_cb = reader.clone();
		let onload = Closure::<dyn FnMut()>::new(move || {
			match reader_cb.result().ok().and_then(|v| v.as_string()) {
				Some(text) => {
					session.apply(|s| {
						let _ = s.import_json(&text);
					});
				}
				None => {
					session.apply(|s| s.notify("Import failed: could not read the file"));
				}
			}
		});
		reader.set_onload(Some(onload.as_ref().unchecked_ref()));
		// One-shot callback owned by the reader from here on.
		onload.forget();
		if reader.read_as_text(&file).is_err() {
			session.apply(|s| s.notify("Import failed: could not read the file"));
		}
		input.set_value("");
	};

	view! {
		<header class="mindmap-toolbar">
			<div class="mindmap-brand">
				<h1>"Mindmap"</h1>
				<p class="subtitle">"Drag nodes to reposition. Ctrl+scroll to zoom. Drag background to pan."</p>
			</div>
			<div class="mindmap-actions">
				<button title="Zoom In" on:click=move |_| {
					session.apply(|s| s.zoom_in());
				}>"+"</button>
				<button title="Zoom Out" on:click=move |_| {
					session.apply(|s| s.zoom_out());
				}>"-"</button>
				<button title="Reset View" on:click=move |_| {
					session.apply(|s| s.reset_view());
				}>"Reset"</button>
				<button class="primary" on:click=on_export>"Export"</button>
				<label class="primary">
					"Import"
					<input type="file" accept=".json" style="display: none;" on:change=on_import />
				</label>
			</div>
		</header>
	}
}

/// Canvas surface. Owns the animation loop and window resize listener.
#[component]
fn MindmapCanvas(session: Session) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let Some(window) = web_sys::window() else {
			return;
		};

		let (w, h) = host_size(&canvas);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);
		session.apply(|s| s.resize(w, h));

		let Some(ctx) = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
		else {
			warn!("mindmap: 2d canvas context unavailable");
			return;
		};

		let canvas_resize = canvas.clone();
		*resize_cb.borrow_mut() = Some(Closure::new(move || {
			let (nw, nh) = host_size(&canvas_resize);
			canvas_resize.set_width(nw as u32);
			canvas_resize.set_height(nh as u32);
			session.apply(|s| s.resize(nw, nh));
		}));
		if let Some(ref cb) = *resize_cb.borrow() {
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}

		let theme = Theme::default();
		let animate_inner = animate.clone();
		*animate.borrow_mut() = Some(Closure::new(move || {
			let drawn = session
				.state
				.try_with_value(|s| render::render(s, &ctx, &theme))
				.is_some();
			if !drawn {
				return;
			}
			if let Some(ref cb) = *animate_inner.borrow() {
				if let Some(win) = web_sys::window() {
					let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
				}
			}
		}));
		if let Some(ref cb) = *animate.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let on_mousedown = move |ev: MouseEvent| {
		if let Some((x, y)) = canvas_coords(canvas_ref, &ev) {
			session.apply(|s| s.pointer_down(x, y));
		}
	};

	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = canvas_coords(canvas_ref, &ev) else {
			return;
		};
		let mut changed = false;
		session.state.update_value(|s| changed = s.pointer_move(x, y));
		if changed {
			session.revision.update(|r| *r += 1);
		}
	};

	let on_mouseup = move |_: MouseEvent| {
		session.apply(|s| s.pointer_up());
	};

	let on_mouseleave = move |_: MouseEvent| {
		session.apply(|s| s.pointer_leave());
	};

	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = canvas_coords(canvas_ref, &ev) else {
			return;
		};
		let input = WheelInput {
			delta_x: ev.delta_x(),
			delta_y: ev.delta_y(),
			x,
			y,
			zoom: ev.ctrl_key() || ev.meta_key(),
		};
		session.apply(|s| s.wheel(input));
	};

	let cursor = move || {
		if session.read(|s| s.interaction().is_idle()) {
			"display: block; cursor: grab;"
		} else {
			"display: block; cursor: grabbing;"
		}
	};

	view! {
		<div class="mindmap-stage">
			<canvas
				node_ref=canvas_ref
				class="mindmap-canvas"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				on:wheel=on_wheel
				style=cursor
			/>
			{move || {
				session
					.read(|s| s.tooltip())
					.map(|tip| {
						view! {
							<div
								class="mindmap-tooltip"
								style=format!("left: {}px; top: {}px;", tip.x + 20.0, tip.y)
							>
								<div class="tooltip-title">{tip.title}</div>
								<div class="tooltip-summary">{tip.summary}</div>
								{tip.excerpt.map(|text| view! { <div class="tooltip-description">{text}"..."</div> })}
							</div>
						}
					})
			}}
		</div>
	}
}

#[component]
fn Sidebar(
	session: Session,
	details: SelectedDetails,
	editing: bool,
	draft: RwSignal<NodeFields>,
) -> impl IntoView {
	let id = details.id.clone();
	let has_children = !details.children.is_empty();

	let body = if editing {
		view! {
			<div class="sidebar-form">
				<label>"Title"</label>
				<input
					type="text"
					prop:value=move || draft.get().title
					on:input=move |ev| draft.update(|d| d.title = event_target_value(&ev))
				/>
				<label>"Summary"</label>
				<textarea
					rows="3"
					prop:value=move || draft.get().summary
					on:input=move |ev| draft.update(|d| d.summary = event_target_value(&ev))
				/>
				<label>"Description"</label>
				<textarea
					rows="5"
					prop:value=move || draft.get().description.unwrap_or_default()
					on:input=move |ev| draft.update(|d| d.description = Some(event_target_value(&ev)))
				/>
				<label>"Notes"</label>
				<textarea
					rows="4"
					prop:value=move || draft.get().notes.unwrap_or_default()
					on:input=move |ev| draft.update(|d| d.notes = Some(event_target_value(&ev)))
				/>
				<div class="sidebar-buttons">
					<button class="primary" on:click=move |_| {
						let fields = draft.get_untracked();
						session.apply(|s| {
							let _ = s.save_edit(fields);
						});
					}>"Save"</button>
					<button on:click=move |_| {
						session.apply(|s| s.cancel_edit());
					}>"Cancel"</button>
				</div>
			</div>
		}
		.into_any()
	} else {
		let (edit_id, add_id, collapse_id, delete_id) = (id.clone(), id.clone(), id.clone(), id.clone());
		view! {
			<div class="sidebar-details">
				<section class="card">
					<h3>"Summary"</h3>
					<p>{details.summary.clone()}</p>
				</section>
				{details.description.clone().map(|text| view! {
					<section class="card"><h3>"Description"</h3><p>{text}</p></section>
				})}
				{details.notes.clone().map(|text| view! {
					<section class="card"><h3>"Notes"</h3><p>{text}</p></section>
				})}
				<button class="primary" on:click=move |_| {
					if let Some(Ok(fields)) = session.apply(|s| s.begin_edit(&edit_id)) {
						draft.set(fields);
					}
				}>"Edit Node"</button>
				<button on:click=move |_| {
					session.apply(|s| {
						if let Ok(new_id) = s.add_child(&add_id, NEW_NODE_TITLE, "") {
							let _ = s.select(&new_id);
						}
					});
				}>"Add Child"</button>
				{has_children.then(|| view! {
					<button on:click=move |_| {
						session.apply(|s| {
							let _ = s.toggle_collapse(&collapse_id);
						});
					}>{if details.collapsed { "Expand" } else { "Collapse" }}</button>
				})}
				{(!details.is_root).then(|| view! {
					<button class="danger" on:click=move |_| {
						session.apply(|s| {
							let _ = s.delete_node(&delete_id);
						});
					}>"Delete"</button>
				})}
				{has_children.then(|| view! {
					<section class="card">
						<h3>{format!("Children ({})", details.children.len())}</h3>
						{details.children.clone().into_iter().map(|(child_id, title)| view! {
							<div class="sidebar-child" on:click=move |_| {
								session.apply(|s| {
									let _ = s.select(&child_id);
								});
							}>{title}</div>
						}).collect_view()}
					</section>
				})}
			</div>
		}
		.into_any()
	};

	view! {
		<aside class="mindmap-sidebar">
			<div class="sidebar-header">
				<div>
					<h2>{details.title.clone()}</h2>
					<span class="badge">{format!("Level {}", details.depth)}</span>
					{has_children.then(|| view! {
						<span class="badge">{format!("{} children", details.children.len())}</span>
					})}
				</div>
				<button title="Close" on:click=move |_| {
					session.apply(|s| s.clear_selection());
				}>"×"</button>
			</div>
			{body}
		</aside>
	}
}
