use crate::game::{Clock, Fruit, GameConfig, GameEngine, RenderEvent, Snake};

use super::canvas::{Canvas, Layer};

/// Turns engine state into drawing commands using the grid-to-pixel
/// transform from the config
pub struct ScenePainter {
    config: GameConfig,
}

impl ScenePainter {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Light fill with dark checkers on every cell where column + row is even
    pub fn paint_background(&self, canvas: &mut impl Canvas) {
        let config = &self.config;
        let tile = config.tile_size;

        canvas.clear(Layer::Background);
        canvas.fill_rect(
            Layer::Background,
            0,
            0,
            config.canvas_width(),
            config.canvas_height(),
            config.colors.background_light,
        );

        for y in 0..config.grid_height as i32 {
            for x in 0..config.grid_width as i32 {
                if (x + y) % 2 == 0 {
                    canvas.fill_rect(
                        Layer::Background,
                        config.screen_x(x),
                        config.screen_y(y),
                        tile,
                        tile,
                        config.colors.background_dark,
                    );
                }
            }
        }
    }

    pub fn paint_fruit(&self, canvas: &mut impl Canvas, fruit: &Fruit) {
        let (x, y) = self.config.point_to_screen(fruit.point);
        let half = self.config.half_tile();
        canvas.fill_circle(
            Layer::Fruits,
            x + half as i64,
            y + half as i64,
            half,
            self.config.colors.fruit,
        );
    }

    pub fn paint_snake(&self, canvas: &mut impl Canvas, snake: &Snake) {
        let tile = self.config.tile_size;
        for cell in snake.body() {
            let (x, y) = self.config.point_to_screen(*cell);
            canvas.fill_rect(Layer::Snakes, x, y, tile, tile, self.config.colors.snake);
        }
    }

    /// Clear the snakes layer and redraw every snake
    pub fn paint_snakes(&self, canvas: &mut impl Canvas, snakes: &[Snake]) {
        canvas.clear(Layer::Snakes);
        for snake in snakes {
            self.paint_snake(canvas, snake);
        }
    }

    /// Paint whatever the drained events ask for. Returns true if anything
    /// was drawn.
    pub fn apply<C: Clock>(
        &self,
        canvas: &mut impl Canvas,
        engine: &GameEngine<C>,
        events: &[RenderEvent],
    ) -> bool {
        for event in events {
            match *event {
                RenderEvent::FruitAdded(id) => {
                    if let Some(fruit) = engine.fruit(id) {
                        self.paint_fruit(canvas, fruit);
                    }
                }
                RenderEvent::SnakeAdded(id) => {
                    if let Some(snake) = engine.snake(id) {
                        self.paint_snake(canvas, snake);
                    }
                }
                RenderEvent::SnakesChanged => self.paint_snakes(canvas, engine.snakes()),
            }
        }
        !events.is_empty()
    }
}
