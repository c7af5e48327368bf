#[cfg(feature = "integration-tests")]
mod lifecycle {
    use portal_scene::{
        context::{Context, InitContext},
        data_structures::color::Color,
        flow::{GraphicsFlow, ImageTestResult, Out, flow_constructor},
        render::Render,
    };
    use winit::event::{DeviceEvent, WindowEvent};

    /// What the two flows observed, shared through the app state.
    #[derive(Default)]
    struct Log {
        inits: u32,
        frames: u32,
        loaded: Vec<&'static str>,
        forwarded: u32,
        consumed: u32,
    }

    enum Event {
        AssetsReady,
    }

    /// Emits the async outputs and forwards every custom event.
    struct Loader;

    /// Consumes the events the loader forwarded.
    struct Listener;

    fn loaded(name: &'static str) -> Box<dyn Future<Output = Box<dyn FnOnce(&mut Log)>>> {
        Box::new(async move {
            let apply: Box<dyn FnOnce(&mut Log)> = Box::new(move |log: &mut Log| log.loaded.push(name));
            apply
        })
    }

    impl GraphicsFlow<Log, Event> for Loader {
        fn on_init(&mut self, _: &mut Context, log: &mut Log) -> Out<Log, Event> {
            log.inits += 1;
            Out::Configure(Box::new(|ctx: &mut Context| ctx.set_clear_colour(Color::BLACK)))
        }

        fn on_update(&mut self, ctx: &Context, log: &mut Log, _: std::time::Duration) -> Out<Log, Event> {
            assert!(ctx.elapsed >= 0.0);
            log.frames += 1;
            match log.frames {
                2 => Out::FutEvent(vec![Box::new(async { Event::AssetsReady })]),
                4 => Out::FutFn(vec![loaded("baked.jpg"), loaded("portal.glb")]),
                _ => Out::Empty,
            }
        }

        fn on_device_events(&mut self, _: &Context, _: &mut Log, _: &DeviceEvent) -> Out<Log, Event> {
            Out::Empty
        }

        fn on_window_events(&mut self, _: &Context, _: &mut Log, _: &WindowEvent) -> Out<Log, Event> {
            Out::Empty
        }

        fn on_custom_events(&mut self, _: &Context, log: &mut Log, event: Event) -> Option<Event> {
            log.forwarded += 1;
            Some(event)
        }

        fn on_render<'pass>(&self) -> Render<'_, 'pass> {
            Render::None
        }

        fn render_to_texture(
            &self,
            ctx: &Context,
            log: &mut Log,
            _: &mut image::ImageBuffer<image::Rgba<u8>, wgpu::BufferView>,
        ) -> Result<ImageTestResult, anyhow::Error> {
            if log.frames < 8 {
                return Ok(ImageTestResult::Waiting);
            }
            assert_eq!(ctx.clear_colour, Color::BLACK.to_wgpu());
            assert_eq!(log.inits, 2);
            assert_eq!(log.loaded, ["baked.jpg", "portal.glb"]);
            Ok(ImageTestResult::Passed)
        }
    }

    impl GraphicsFlow<Log, Event> for Listener {
        fn on_init(&mut self, _: &mut Context, log: &mut Log) -> Out<Log, Event> {
            log.inits += 1;
            Out::Empty
        }

        fn on_update(&mut self, _: &Context, _: &mut Log, _: std::time::Duration) -> Out<Log, Event> {
            Out::Empty
        }

        fn on_device_events(&mut self, _: &Context, _: &mut Log, _: &DeviceEvent) -> Out<Log, Event> {
            Out::Empty
        }

        fn on_window_events(&mut self, _: &Context, _: &mut Log, _: &WindowEvent) -> Out<Log, Event> {
            Out::Empty
        }

        fn on_custom_events(&mut self, _: &Context, log: &mut Log, event: Event) -> Option<Event> {
            match event {
                Event::AssetsReady => {
                    assert!(log.frames >= 2);
                    assert_eq!(log.forwarded, log.consumed + 1);
                    log.consumed += 1;
                    None
                }
            }
        }

        fn on_render<'pass>(&self) -> Render<'_, 'pass> {
            Render::None
        }

        fn render_to_texture(
            &self,
            _: &Context,
            log: &mut Log,
            _: &mut image::ImageBuffer<image::Rgba<u8>, wgpu::BufferView>,
        ) -> Result<ImageTestResult, anyhow::Error> {
            if log.frames < 8 {
                return Ok(ImageTestResult::Waiting);
            }
            assert_eq!(log.consumed, 1);
            Ok(ImageTestResult::Passed)
        }
    }

    #[test]
    fn should_run_hooks_and_deliver_async_outputs() {
        let loader = flow_constructor(|_: InitContext| async {
            Box::new(Loader) as Box<dyn GraphicsFlow<Log, Event>>
        });
        let listener = flow_constructor(|_: InitContext| async {
            Box::new(Listener) as Box<dyn GraphicsFlow<Log, Event>>
        });
        if let Err(e) = portal_scene::flow::run(vec![loader, listener]) {
            panic!("{e}");
        }
    }
}
