use crate::{
    config::BuildMode,
    navigation::{MemoryNavigator, Navigator},
    page::PageRegistry,
    render::{RenderOutcome, render},
    route::RouteTable,
    store::{ClientStateStore, StoreEvent, StoreSnapshot},
};

/// Upper bound on redirects followed while settling one navigation.
pub const MAX_REDIRECTS: usize = 8;

/// Console
///
/// The route table plus the page implementations: everything needed to turn
/// a location and a store snapshot into a render outcome.
#[derive(Clone)]
pub struct Console {
    table: RouteTable,
    pages: PageRegistry,
}

impl Console {
    pub fn new(table: RouteTable, pages: PageRegistry) -> Self {
        Self { table, pages }
    }

    /// The console route table with the standard page implementations.
    pub fn standard(build: BuildMode) -> Self {
        Self::new(RouteTable::console(build), PageRegistry::standard())
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    pub fn pages(&self) -> &PageRegistry {
        &self.pages
    }

    /// One render pass at the navigator's current location. Redirects are
    /// recorded on the navigator but not followed.
    pub fn render(&self, snapshot: &StoreSnapshot, navigator: &mut dyn Navigator) -> RenderOutcome {
        render(&self.table, &self.pages, snapshot, navigator)
    }

    /// settle
    ///
    /// Renders, following redirects until the outcome is a render or a
    /// deferral. Stops after [`MAX_REDIRECTS`] hops and returns the last redirect.
    pub fn settle(&self, snapshot: &StoreSnapshot, navigator: &mut dyn Navigator) -> RenderOutcome {
        let mut outcome = self.render(snapshot, navigator);
        let mut hops = 0;
        while let RenderOutcome::Redirect { to } = &outcome {
            if hops == MAX_REDIRECTS {
                tracing::warn!(%to, hops, "redirect loop, giving up");
                break;
            }
            hops += 1;
            outcome = self.render(snapshot, navigator);
        }
        outcome
    }
}

/// ConsoleApp
///
/// The in-process host: owns the store and the history, and re-renders the
/// current location whenever the store changes. This is how a deferred render
/// gets re-invoked once the session is known.
pub struct ConsoleApp {
    console: Console,
    store: ClientStateStore,
    navigator: MemoryNavigator,
    outcome: RenderOutcome,
    rendered_version: u64,
}

impl ConsoleApp {
    pub fn new(console: Console, store: ClientStateStore, initial: &str) -> Self {
        let mut navigator = MemoryNavigator::new(initial);
        let snapshot = store.snapshot();
        let outcome = console.settle(&snapshot, &mut navigator);
        Self {
            console,
            rendered_version: snapshot.version,
            store,
            navigator,
            outcome,
        }
    }

    /// Follows a link.
    pub fn visit(&mut self, location: &str) -> &RenderOutcome {
        self.navigator.navigate_to(location);
        self.rerender();
        &self.outcome
    }

    /// Applies a store event and re-renders if the state moved.
    pub fn dispatch(&mut self, event: StoreEvent) -> &RenderOutcome {
        self.store.dispatch(event);
        if self.store.version() != self.rendered_version {
            self.rerender();
        }
        &self.outcome
    }

    pub fn outcome(&self) -> &RenderOutcome {
        &self.outcome
    }

    pub fn location(&self) -> &str {
        self.navigator.current_path()
    }

    pub fn history(&self) -> &[String] {
        self.navigator.history()
    }

    pub fn store(&self) -> &ClientStateStore {
        &self.store
    }

    fn rerender(&mut self) {
        let snapshot = self.store.snapshot();
        self.outcome = self.console.settle(&snapshot, &mut self.navigator);
        self.rendered_version = snapshot.version;
    }
}
