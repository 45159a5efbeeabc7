//! Built-in LaTeX templates. The full resume template seeds the editor when
//! no prior state can be recovered; the blank canvas backs the new-document
//! action.

pub const DEFAULT_TEMPLATE: &str = r#"%-------------------------
% Resume in LaTeX
% Author: Your Name
%-------------------------

\documentclass[11pt,a4paper]{article}

\usepackage[utf8]{inputenc}
\usepackage[T1]{fontenc}
\usepackage{lmodern}
\usepackage[margin=0.75in]{geometry}
\usepackage{hyperref}
\usepackage{enumitem}
\usepackage{titlesec}
\usepackage{xcolor}

% Colors
\definecolor{primary}{RGB}{45, 55, 72}
\definecolor{accent}{RGB}{79, 70, 229}

% Section formatting
\titleformat{\section}{\Large\bfseries\color{primary}}{}{0em}{}[\titlerule]
\titlespacing{\section}{0pt}{12pt}{8pt}

% Remove page numbers
\pagenumbering{gobble}

% Custom commands
\newcommand{\resumeItem}[1]{\item\small{#1}}
\newcommand{\resumeSubheading}[4]{
  \item
    \begin{tabular*}{\textwidth}{l@{\extracolsep{\fill}}r}
      \textbf{#1} & #2 \\
      \textit{\small#3} & \textit{\small #4} \\
    \end{tabular*}
}

\begin{document}

%----------HEADING----------
\begin{center}
    {\Huge\bfseries Your Name} \\[4pt]
    \small
    \href{mailto:email@example.com}{email@example.com} $|$
    \href{tel:+1234567890}{(123) 456-7890} $|$
    \href{https://linkedin.com/in/yourprofile}{LinkedIn} $|$
    \href{https://github.com/yourusername}{GitHub}
\end{center}

%----------EDUCATION----------
\section{Education}
\begin{itemize}[leftmargin=0.15in, label={}]
    \resumeSubheading
      {University Name}{City, State}
      {Bachelor of Science in Computer Science}{Aug 2019 -- May 2023}
\end{itemize}

%----------EXPERIENCE----------
\section{Experience}
\begin{itemize}[leftmargin=0.15in, label={}]
    \resumeSubheading
      {Software Engineer}{Jan 2023 -- Present}
      {Company Name}{City, State}
      \begin{itemize}
          \resumeItem{Developed and maintained web applications using React and Node.js}
          \resumeItem{Collaborated with cross-functional teams to deliver features on schedule}
          \resumeItem{Improved application performance by 40\% through code optimization}
      \end{itemize}
\end{itemize}

%----------PROJECTS----------
\section{Projects}
\begin{itemize}[leftmargin=0.15in, label={}]
    \item
    \textbf{Project Name} $|$ \textit{React, Node.js, MongoDB} \\
    \small{A brief description of the project and its key features.}
\end{itemize}

%----------SKILLS----------
\section{Skills}
\begin{itemize}[leftmargin=0.15in, label={}]
    \item
    \textbf{Languages:} JavaScript, Python, Java, C++ \\
    \textbf{Frameworks:} React, Node.js, Express, Django \\
    \textbf{Tools:} Git, Docker, AWS, PostgreSQL
\end{itemize}

\end{document}
"#;

/// Minimal blank canvas for the new-document action.
pub const BLANK_TEMPLATE: &str = r#"\documentclass[11pt,a4paper]{article}

\usepackage[margin=0.75in]{geometry}

\begin{document}

% Start writing your LaTeX content here

\end{document}
"#;
