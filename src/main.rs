use orb_ngin::app::{self, AppConstructor, GraphicsApp};
use orb_ngin::globe::GlobeApp;

fn main() -> anyhow::Result<()> {
    let globe: AppConstructor = Box::new(|ctx| {
        Box::pin(async move { Ok(Box::new(GlobeApp::new(&ctx).await?) as Box<dyn GraphicsApp>) })
    });
    app::run(globe)
}
