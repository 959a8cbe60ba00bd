fn main() -> iced::Result {
    dicomovie::app::run()
}
