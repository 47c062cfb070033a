use leptos::prelude::*;

use crate::components::force_graph::ForceGraphCanvas;
use crate::graph::Triple;

/// Built-in demo facts: pad equipment and the symptoms reported against it.
fn sample_triples() -> Vec<Triple> {
	[
		("ENG-12", "located_at", "PAD-A", ""),
		("TRANS-12", "located_at", "PAD-A", ""),
		("FLUEND-12", "located_at", "PAD-A", ""),
		("ENG-27", "located_at", "PAD-B", ""),
		("ENG-34", "located_at", "PAD-C", ""),
		("ENG-12", "reports", "high oil temp", "high"),
		("ENG-12", "reports", "low oil pressure", "medium"),
		("ENG-27", "reports", "high oil temp", "medium"),
		("TRANS-12", "reports", "high oil temp", "high"),
		("TRANS-12", "reports", "pressure spike", "high"),
		("FLUEND-12", "reports", "vibration", "medium"),
		("FLUEND-12", "risks", "cavitation", "high"),
		("ENG-34", "reports", "within range", "low"),
		("vibration", "precedes", "cavitation", "low"),
		("maintenance", "inspects", "TRANS-12", ""),
		("maintenance", "inspects", "ENG-12", ""),
	]
	.into_iter()
	.map(|(s, p, o, sev)| Triple::new(s, p, o, sev))
	.collect()
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let triples = Signal::derive(sample_triples);

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="fullscreen-graph">
				<ForceGraphCanvas triples=triples fullscreen=true />
				<div class="graph-overlay">
					<h1>"Semantic Risk Graph"</h1>
					<p class="subtitle">
						"Drag nodes to reposition. Drag background or scroll to pan. Select a node for link predictions."
					</p>
				</div>
			</div>
		</ErrorBoundary>
	}
}
