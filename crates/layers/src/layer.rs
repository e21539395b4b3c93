#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct LayerId(pub u64);

/// Rendering surface a layer targets.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum LayerView {
    Map,
    Globe,
}

impl LayerView {
    pub fn as_str(self) -> &'static str {
        match self {
            LayerView::Map => "map",
            LayerView::Globe => "globe",
        }
    }
}

pub trait Layer {
    fn id(&self) -> LayerId;
    fn view(&self) -> LayerView;
}
