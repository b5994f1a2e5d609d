//! Drawing primitives the scene painter talks to

/// Stacking order, bottom first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    Background,
    Fruits,
    Snakes,
}

impl Layer {
    pub const ALL: [Layer; 3] = [Layer::Background, Layer::Fruits, Layer::Snakes];

    fn index(self) -> usize {
        match self {
            Layer::Background => 0,
            Layer::Fruits => 1,
            Layer::Snakes => 2,
        }
    }
}

/// Pixel-space drawing surface split into layers
pub trait Canvas {
    fn fill_rect(&mut self, layer: Layer, x: i64, y: i64, width: u32, height: u32, color: u32);

    fn fill_circle(&mut self, layer: Layer, cx: i64, cy: i64, radius: u32, color: u32);

    /// Drop everything drawn on `layer`
    fn clear(&mut self, layer: Layer);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawCommand {
    Rect {
        x: i64,
        y: i64,
        width: u32,
        height: u32,
        color: u32,
    },
    Circle {
        cx: i64,
        cy: i64,
        radius: u32,
        color: u32,
    },
}

/// A canvas that records commands so they can be replayed or inspected
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplayList {
    layers: [Vec<DrawCommand>; 3],
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self, layer: Layer) -> &[DrawCommand] {
        &self.layers[layer.index()]
    }

    /// Every command, bottom layer first
    pub fn iter(&self) -> impl Iterator<Item = &DrawCommand> {
        self.layers.iter().flatten()
    }

    pub fn len(&self) -> usize {
        self.layers.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Canvas for DisplayList {
    fn fill_rect(&mut self, layer: Layer, x: i64, y: i64, width: u32, height: u32, color: u32) {
        self.layers[layer.index()].push(DrawCommand::Rect {
            x,
            y,
            width,
            height,
            color,
        });
    }

    fn fill_circle(&mut self, layer: Layer, cx: i64, cy: i64, radius: u32, color: u32) {
        self.layers[layer.index()].push(DrawCommand::Circle {
            cx,
            cy,
            radius,
            color,
        });
    }

    fn clear(&mut self, layer: Layer) {
        self.layers[layer.index()].clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layers_are_independent() {
        let mut list = DisplayList::new();
        list.fill_rect(Layer::Background, 0, 0, 10, 10, 0x111111);
        list.fill_circle(Layer::Fruits, 5, 5, 2, 0x222222);
        list.fill_rect(Layer::Snakes, 1, 1, 1, 1, 0x333333);
        assert_eq!(list.len(), 3);

        list.clear(Layer::Snakes);
        assert!(list.commands(Layer::Snakes).is_empty());
        assert_eq!(list.commands(Layer::Fruits).len(), 1);
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_iter_is_bottom_up() {
        let mut list = DisplayList::new();
        list.fill_rect(Layer::Snakes, 0, 0, 1, 1, 3);
        list.fill_circle(Layer::Fruits, 0, 0, 1, 2);
        list.fill_rect(Layer::Background, 0, 0, 1, 1, 1);

        let colors: Vec<u32> = list
            .iter()
            .map(|c| match c {
                DrawCommand::Rect { color, .. } | DrawCommand::Circle { color, .. } => *color,
            })
            .collect();
        assert_eq!(colors, vec![1, 2, 3]);
    }
}
