use services::quiz_view::{AlertModel, QuizStepView, QuizView};

/// Renders the quiz on stdout.
///
/// Purely a presentation surface; all round state stays in the quiz loop.
pub struct ConsoleView;

impl QuizView for ConsoleView {
    fn show_step(&self, step: QuizStepView) {
        println!();
        println!("Вопрос {}", step.question_number);
        println!("Постер: {}", step.poster);
        println!("{}", step.question);
        println!("Ответ (д/н):");
    }

    fn show_alert(&self, model: AlertModel) {
        println!();
        println!("=== {} ===", model.title);
        println!("{}", model.message);
        println!("[Enter] {}", model.button_text);
    }

    fn highlight_answer(&self, is_correct: bool) {
        println!("{}", if is_correct { "Верно!" } else { "Неверно!" });
    }

    fn show_loading(&self) {
        println!("Загрузка...");
    }

    fn hide_loading(&self) {}

    fn show_error(&self, message: String) {
        println!();
        println!("=== {} ===", services::quiz_view::LOAD_ERROR_TITLE);
        println!("{message}");
        println!("[Enter] {}", services::quiz_view::TRY_AGAIN_BUTTON);
    }
}
