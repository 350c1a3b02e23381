use super::Host;
use super::document::{Display, Document, PRINTING_CLASS, Position};
use super::navigator::{NavigationObserver, Navigator};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrintState {
    #[default]
    Normal,
    Printing,
}

/// Switches the document between the one-slide overlay layout and the
/// all-slides flow layout used for printing.
#[derive(Debug, Clone, Default)]
pub struct PrintView {
    state: PrintState,
}

impl PrintView {
    pub fn state(&self) -> PrintState {
        self.state
    }

    /// Normal -> Printing: every slide becomes visible in document flow.
    pub fn before_print(&mut self, document: &mut Document) {
        if self.state == PrintState::Printing {
            return;
        }
        document.add_body_class(PRINTING_CLASS);
        for slide in &mut document.slides {
            slide.display = Display::Block;
            slide.position = Position::Relative;
        }
        self.state = PrintState::Printing;
        log::info!("print layout: {} slides", document.slides.len());
    }

    /// Printing -> Normal: only the navigator's current slide stays visible.
    /// Navigation state is read, never written.
    pub fn after_print<O: NavigationObserver>(
        &mut self,
        document: &mut Document,
        navigator: &Navigator<O>,
    ) {
        if self.state == PrintState::Normal {
            return;
        }
        document.remove_body_class(PRINTING_CLASS);
        let current = navigator.current();
        for (i, slide) in document.slides.iter_mut().enumerate() {
            if i + 1 == current {
                slide.display = Display::Flex;
                slide.position = Position::Absolute;
            } else {
                slide.display = Display::Hidden;
            }
        }
        self.state = PrintState::Normal;
        log::info!("print finished, restored slide {current}");
    }

    /// Hand the document to the host's print facility.
    pub fn generate_pdf(&self, host: &mut dyn Host) {
        host.print();
    }
}
